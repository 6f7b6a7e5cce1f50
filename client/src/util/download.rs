//! Browser downloads and clipboard access.
//!
//! Files are handed to the browser through an object URL on a temporary
//! anchor; nothing is written server-side.

/// MIME type for agent config downloads.
pub const TEXT_MIME: &str = "text/plain;charset=utf-8";
/// MIME type for PDF reports.
pub const PDF_MIME: &str = "application/pdf";

/// Offer `bytes` to the user as a file named `file_name`.
///
/// # Errors
///
/// Returns a message if the DOM calls fail or no browser is available.
pub fn save_bytes(file_name: &str, bytes: &[u8], mime: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|_| "could not build file".to_owned())?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|_| "could not create download link".to_owned())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| "no document".to_owned())?;
        let anchor = document
            .create_element("a")
            .ok()
            .and_then(|el| el.dyn_into::<web_sys::HtmlAnchorElement>().ok())
            .ok_or_else(|| "could not create download link".to_owned())?;
        anchor.set_href(&url);
        anchor.set_download(file_name);
        if let Some(body) = document.body() {
            let _ = body.append_child(&anchor);
            anchor.click();
            let _ = body.remove_child(&anchor);
        } else {
            anchor.click();
        }
        let _ = web_sys::Url::revoke_object_url(&url);
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (file_name, bytes, mime);
        Err("downloads are only available in the browser".to_owned())
    }
}

/// Offer a text file for download.
///
/// # Errors
///
/// Same as [`save_bytes`].
pub fn save_text(file_name: &str, text: &str) -> Result<(), String> {
    save_bytes(file_name, text.as_bytes(), TEXT_MIME)
}

/// Copy `text` to the clipboard.
///
/// # Errors
///
/// Returns a message if the clipboard is unavailable or denies the write.
#[allow(clippy::unused_async)]
pub async fn copy_text(text: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let window = web_sys::window().ok_or_else(|| "no window".to_owned())?;
        let promise = window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|_| "could not copy to clipboard".to_owned())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = text;
        Err("clipboard is only available in the browser".to_owned())
    }
}

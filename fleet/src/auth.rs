//! Login and registration form validation.
//!
//! Validation runs before any request is sent; a form that fails it never
//! reaches the network.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::Serialize;

use crate::error::{
    MAX_TENANT_NAME_LEN, MIN_PASSWORD_LEN, MIN_TENANT_ID_LEN, MIN_TENANT_NAME_LEN, ValidationError,
};
use crate::scope::Scope;

/// Regions a tenant can be registered in.
pub const REGIONS: [&str; 5] = ["Mexicali", "Tijuana", "Ensenada", "Rosarito", "Tecate"];

/// Check that `region` is one of [`REGIONS`].
///
/// # Errors
///
/// [`ValidationError::UnknownRegion`] otherwise.
pub fn validate_region(region: &str) -> Result<(), ValidationError> {
    if REGIONS.contains(&region) {
        Ok(())
    } else {
        Err(ValidationError::UnknownRegion(region.to_owned()))
    }
}

/// Validate a tenant display name and return it trimmed.
///
/// # Errors
///
/// [`ValidationError::TenantNameLength`] outside the accepted range.
pub fn validate_tenant_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(MIN_TENANT_NAME_LEN..=MAX_TENANT_NAME_LEN).contains(&len) {
        return Err(ValidationError::TenantNameLength {
            min: MIN_TENANT_NAME_LEN,
            max: MAX_TENANT_NAME_LEN,
        });
    }
    Ok(trimmed.to_owned())
}

/// Body of `POST /login`. Field names follow the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(rename = "ciudad")]
    pub region: String,
    #[serde(rename = "empresaId")]
    pub tenant_id: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// [`ValidationError::MissingFields`] if any field is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [&self.email, &self.password, &self.region, &self.tenant_id];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }

    /// Scope to store once the backend accepts the login.
    #[must_use]
    pub fn scope(&self, tenant_id: &str) -> Option<Scope> {
        Scope::from_parts(Some(tenant_id), Some(&self.region))
    }
}

/// Steps of the registration wizard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WizardStep {
    #[default]
    Credentials,
    Company,
    Confirm,
    Done,
}

impl WizardStep {
    /// Zero-based index for step indicators.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Credentials => 0,
            Self::Company => 1,
            Self::Confirm => 2,
            Self::Done => 3,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Credentials => "Account",
            Self::Company => "Company",
            Self::Confirm => "Confirm",
            Self::Done => "Done",
        }
    }
}

/// Body of `POST /api/registro`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistrationPayload {
    pub email: String,
    pub password: String,
    #[serde(rename = "ciudad")]
    pub region: String,
    #[serde(rename = "empresaId")]
    pub tenant_id: String,
}

/// Three-step registration form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationWizard {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub region: String,
    pub tenant_id: String,
    step: WizardStep,
}

impl RegistrationWizard {
    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Validate the current step and advance.
    ///
    /// # Errors
    ///
    /// The first failed rule of the current step; the step is unchanged.
    pub fn next(&mut self) -> Result<WizardStep, ValidationError> {
        match self.step {
            WizardStep::Credentials => {
                self.validate_credentials()?;
                self.step = WizardStep::Company;
            }
            WizardStep::Company => {
                self.validate_company()?;
                self.step = WizardStep::Confirm;
            }
            WizardStep::Confirm | WizardStep::Done => {}
        }
        Ok(self.step)
    }

    /// Go back one step. No-op on the first and last step.
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Company => WizardStep::Credentials,
            WizardStep::Confirm => WizardStep::Company,
            other => other,
        };
        self.step
    }

    /// Request body, available once every step validates.
    ///
    /// # Errors
    ///
    /// The first failing rule across all steps.
    pub fn payload(&self) -> Result<RegistrationPayload, ValidationError> {
        self.validate_credentials()?;
        self.validate_company()?;
        Ok(RegistrationPayload {
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
            region: self.region.clone(),
            tenant_id: self.tenant_id.trim().to_owned(),
        })
    }

    /// Mark the registration accepted by the backend.
    pub fn complete(&mut self) {
        if self.step == WizardStep::Confirm {
            self.step = WizardStep::Done;
        }
    }

    fn validate_credentials(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
        }
        Ok(())
    }

    fn validate_company(&self) -> Result<(), ValidationError> {
        let tenant_id = self.tenant_id.trim();
        if tenant_id.is_empty() || self.region.trim().is_empty() {
            return Err(ValidationError::MissingScope);
        }
        if tenant_id.chars().count() < MIN_TENANT_ID_LEN {
            return Err(ValidationError::TenantIdTooShort { min: MIN_TENANT_ID_LEN });
        }
        validate_region(&self.region)
    }
}

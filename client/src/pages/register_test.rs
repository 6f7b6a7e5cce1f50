use super::*;

#[test]
fn step_indicator_marks_progress() {
    let current = WizardStep::Company;
    assert_eq!(step_class(WizardStep::Credentials, current), "wizard-step wizard-step--done");
    assert_eq!(step_class(WizardStep::Company, current), "wizard-step wizard-step--active");
    assert_eq!(step_class(WizardStep::Confirm, current), "wizard-step");
}

#[test]
fn finished_wizard_marks_every_step_done() {
    for step in STEPS {
        assert_eq!(step_class(step, WizardStep::Done), "wizard-step wizard-step--done");
    }
}

#[test]
fn password_is_masked_per_character() {
    assert_eq!(masked("secret"), "••••••");
    assert_eq!(masked(""), "");
}

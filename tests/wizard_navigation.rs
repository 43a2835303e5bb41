use compliance_desk::{
    api::SubmitCollaborator,
    errors::{ApiError, FormError},
    forms::{
        FieldDescriptor, FieldKind, FormDefinition, FormField, FormRecord, Validator, Wizard,
        WizardStep,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Name,
    Email,
    Notes,
}

impl FormField for Field {
    const ALL: &'static [Self] = &[Field::Name, Field::Email, Field::Notes];

    fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Notes => "notes",
        }
    }
}

const STEPS: &[WizardStep<Field>] = &[
    WizardStep {
        id: "identity",
        title: "Identity",
        description: "Who is this for?",
        fields: &[Field::Name],
        is_required: true,
        estimated_time: "1 min",
    },
    WizardStep {
        id: "contact",
        title: "Contact",
        description: "Where do we send updates?",
        fields: &[Field::Email],
        is_required: false,
        estimated_time: "1 min",
    },
    WizardStep {
        id: "notes",
        title: "Notes",
        description: "Anything else?",
        fields: &[Field::Notes],
        is_required: false,
        estimated_time: "1 min",
    },
];

struct ScenarioForm;

impl FormDefinition for ScenarioForm {
    type Field = Field;
    type Output = String;

    fn name(&self) -> &'static str {
        "scenario"
    }

    fn steps(&self) -> &[WizardStep<Field>] {
        STEPS
    }

    fn field(&self, field: Field) -> FieldDescriptor {
        match field {
            Field::Name => FieldDescriptor::new("Name", FieldKind::Text, Validator::NonEmpty),
            Field::Email => FieldDescriptor::new("Email", FieldKind::Email, Validator::Email),
            Field::Notes => {
                FieldDescriptor::new("Notes", FieldKind::LongText, Validator::MaxLength(20))
                    .with_optional()
            }
        }
    }

    fn assemble(&self, record: &FormRecord<Field>) -> Result<String, FormError> {
        Ok(record.get(Field::Name).unwrap_or_default().to_string())
    }
}

struct Sink(Vec<String>);

impl SubmitCollaborator<String> for Sink {
    type Response = ();

    fn submit(&mut self, payload: &String) -> Result<(), ApiError> {
        self.0.push(payload.clone());
        Ok(())
    }
}

fn wizard() -> Wizard<ScenarioForm> {
    Wizard::new(ScenarioForm).unwrap()
}

#[test]
fn blank_required_step_blocks_jump_and_keeps_cursor() {
    let mut wizard = wizard();
    wizard.set_value(Field::Name, "").unwrap();

    let err = wizard.go_to_step(2).unwrap_err();
    assert!(matches!(err, FormError::StepIncomplete { index: 0, .. }));
    assert_eq!(wizard.current_step_index(), 0);
    assert_eq!(wizard.state().step_validity(0), Some(false));
}

#[test]
fn filled_required_step_allows_jump_past_unvisited_steps() {
    let mut wizard = wizard();
    wizard.set_value(Field::Name, "Acme").unwrap();

    wizard.go_to_step(2).unwrap();
    assert_eq!(wizard.current_step_index(), 2);
    assert!(wizard.state().completed_steps().contains(&0));
    assert_eq!(wizard.state().step_validity(1), None);
}

#[test]
fn backward_and_same_step_moves_always_succeed() {
    let mut wizard = wizard();
    wizard.set_value(Field::Name, "Acme").unwrap();
    wizard.set_value(Field::Email, "ops@acme.test").unwrap();
    wizard.go_to_step(2).unwrap();

    wizard.set_value(Field::Name, "").unwrap();
    wizard.set_value(Field::Email, "not-an-email").unwrap();
    for target in (0..=2).rev() {
        wizard.go_to_step(target).unwrap();
        assert_eq!(wizard.current_step_index(), target);
        wizard.go_to_step(target).unwrap();
    }
}

#[test]
fn forward_moves_fail_only_from_invalid_required_steps() {
    // (step, value that makes it valid, value that makes it invalid)
    let cases = [
        (0, Field::Name, "Acme", ""),
        (1, Field::Email, "ops@acme.test", "nope"),
    ];
    for (step, field, good, bad) in cases {
        for valid in [true, false] {
            let mut wizard = wizard();
            wizard.set_value(Field::Name, "Acme").unwrap();
            wizard.set_value(Field::Email, "ops@acme.test").unwrap();
            wizard.go_to_step(step).unwrap();
            wizard.set_value(field, if valid { good } else { bad }).unwrap();

            let target = step + 1;
            let required = STEPS[step].is_required;
            let result = wizard.go_to_step(target);
            assert_eq!(result.is_err(), required && !valid, "step {step}, valid {valid}");
        }
    }
}

#[test]
fn validate_step_is_idempotent() {
    let mut wizard = wizard();
    wizard.set_value(Field::Email, "  OPS@Acme.test ").unwrap();

    let first = wizard.validate_step(1).is_ok();
    let snapshot = (wizard.state().clone(), wizard.record().clone());
    let second = wizard.validate_step(1).is_ok();

    assert_eq!(first, second);
    assert_eq!(snapshot, (wizard.state().clone(), wizard.record().clone()));

    wizard.set_value(Field::Name, "").unwrap();
    let first = wizard.validate_step(0).unwrap_err().to_string();
    let second = wizard.validate_step(0).unwrap_err().to_string();
    assert_eq!(first, second);
}

#[test]
fn submit_requires_terminal_step_and_delivers_once() {
    let mut wizard = wizard();
    let mut sink = Sink(Vec::new());
    assert!(matches!(
        wizard.submit(&mut sink),
        Err(FormError::NotAtFinalStep)
    ));

    wizard.set_value(Field::Name, "Acme").unwrap();
    wizard.set_value(Field::Email, "ops@acme.test").unwrap();
    wizard.next().unwrap();
    wizard.next().unwrap();
    wizard.submit(&mut sink).unwrap();

    assert_eq!(sink.0, vec!["Acme".to_string()]);
    assert!(wizard.is_submitted());
    assert!(matches!(
        wizard.submit(&mut sink),
        Err(FormError::AlreadySubmitted)
    ));
}

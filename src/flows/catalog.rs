use crate::core::value::FormData;
use crate::flows::view::{FieldEvent, FieldStack, StepProps, StepResponse, StepView};
use crate::input::{ChoiceInput, ChoiceOption, Input};
use crate::terminal::KeyEvent;
use crate::ui::renderer::RenderFrame;
use crate::ui::span::{Span, SpanLine};
use crate::validation::PAYMENT_METHOD_REQUIRED;

/// Form key both wizards store the selected method ids under.
pub const PAYMENT_METHODS_FIELD: &str = "paymentMethods";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const PAYMENT_METHODS: &[PaymentMethod] = &[
    PaymentMethod {
        id: "tikkie",
        label: "Tikkie",
        description: "Nederlandse banken",
    },
    PaymentMethod {
        id: "paypal",
        label: "PayPal",
        description: "Wereldwijd beschikbaar",
    },
    PaymentMethod {
        id: "ideal",
        label: "iDEAL",
        description: "Nederlandse banken",
    },
    PaymentMethod {
        id: "mollie",
        label: "Mollie",
        description: "iDEAL, creditcard en meer",
    },
    PaymentMethod {
        id: "bancontact",
        label: "Bancontact",
        description: "Belgische banken",
    },
    PaymentMethod {
        id: "bank-transfer",
        label: "Bankoverschrijving",
        description: "Handmatige betaling",
    },
];

/// Labels for the given ids in catalogue order; unknown ids are skipped.
pub fn labels(ids: &[String]) -> Vec<&'static str> {
    PAYMENT_METHODS
        .iter()
        .filter(|method| ids.iter().any(|id| id == method.id))
        .map(|method| method.label)
        .collect()
}

pub fn choice_options() -> Vec<ChoiceOption> {
    PAYMENT_METHODS
        .iter()
        .map(|method| ChoiceOption::new(method.id, method.label, method.description))
        .collect()
}

/// Checkbox list over the catalogue. The "select at least one" message only
/// appears once the record holds a (possibly empty) selection.
pub struct PaymentMethodsView {
    fields: FieldStack,
    tip: Option<&'static str>,
}

impl PaymentMethodsView {
    pub fn new(data: &FormData) -> Self {
        let input = ChoiceInput::new(PAYMENT_METHODS_FIELD, "Betaalmethodes", choice_options())
            .with_selected(data.list(PAYMENT_METHODS_FIELD));
        let fields: Vec<Box<dyn Input>> = vec![Box::new(input)];
        Self {
            fields: FieldStack::new(fields),
            tip: None,
        }
    }

    pub fn with_tip(mut self, tip: &'static str) -> Self {
        self.tip = Some(tip);
        self
    }
}

impl StepView<FormData> for PaymentMethodsView {
    fn render(&self, props: &StepProps<'_, FormData>) -> RenderFrame {
        let theme = props.theme;
        let mut frame = self.fields.render(theme, props.errors);
        let data = props.data;
        if data.contains_key(PAYMENT_METHODS_FIELD) && data.list(PAYMENT_METHODS_FIELD).is_empty() {
            frame.push(vec![Span::styled(format!("    {PAYMENT_METHOD_REQUIRED}"), theme.error)]);
        }
        if let Some(tip) = self.tip {
            frame.push(SpanLine::new());
            frame.push(vec![
                Span::styled("  Tip: ", theme.accent),
                Span::styled(tip, theme.muted),
            ]);
        }
        frame.push(vec![Span::styled("  Spatie: selecteren", theme.hint)]);
        frame
    }

    fn handle_key(&mut self, key: KeyEvent, _props: &StepProps<'_, FormData>) -> StepResponse<FormData> {
        match self.fields.handle_key(key) {
            FieldEvent::Changed { value, .. } => {
                let ids: Vec<String> = value
                    .split(',')
                    .filter(|id| !id.is_empty())
                    .map(ToOwned::to_owned)
                    .collect();
                StepResponse::Change(FormData::new().with(PAYMENT_METHODS_FIELD, ids))
            }
            FieldEvent::Handled => StepResponse::Handled,
            FieldEvent::Submit => StepResponse::Next,
            FieldEvent::Ignored => StepResponse::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PAYMENT_METHODS, PAYMENT_METHODS_FIELD, PaymentMethodsView, labels};
    use crate::core::errors::WizardErrors;
    use crate::core::value::FormData;
    use crate::flows::view::{StepProps, StepResponse, StepView};
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::ui::span::line_text;
    use crate::ui::theme::Theme;
    use crate::validation::PAYMENT_METHOD_REQUIRED;

    fn rendered(view: &PaymentMethodsView, data: &FormData) -> Vec<String> {
        let errors = WizardErrors::new();
        let theme = Theme::default_theme();
        let props = StepProps {
            data,
            can_proceed: false,
            is_loading: false,
            can_skip: false,
            errors: &errors,
            theme: &theme,
        };
        view.render(&props).lines.iter().map(|line| line_text(line)).collect()
    }

    #[test]
    fn ids_are_unique() {
        for (idx, method) in PAYMENT_METHODS.iter().enumerate() {
            assert!(PAYMENT_METHODS[idx + 1..].iter().all(|m| m.id != method.id));
        }
    }

    #[test]
    fn labels_follow_catalogue_order() {
        let ids = vec!["ideal".to_string(), "tikkie".to_string(), "bitcoin".to_string()];
        assert_eq!(labels(&ids), vec!["Tikkie", "iDEAL"]);
    }

    #[test]
    fn toggling_emits_the_full_selection() {
        let data = FormData::new();
        let errors = WizardErrors::new();
        let theme = Theme::default_theme();
        let props = StepProps {
            data: &data,
            can_proceed: false,
            is_loading: false,
            can_skip: false,
            errors: &errors,
            theme: &theme,
        };
        let mut view = PaymentMethodsView::new(&data);
        view.handle_key(KeyEvent::plain(KeyCode::Char(' ')), &props);
        view.handle_key(KeyEvent::plain(KeyCode::Down), &props);
        let response = view.handle_key(KeyEvent::plain(KeyCode::Char(' ')), &props);
        assert_eq!(
            response,
            StepResponse::Change(
                FormData::new().with(PAYMENT_METHODS_FIELD, vec!["tikkie".to_string(), "paypal".to_string()])
            )
        );
    }

    #[test]
    fn empty_selection_message_waits_for_interaction() {
        let view = PaymentMethodsView::new(&FormData::new());
        assert!(!rendered(&view, &FormData::new()).iter().any(|l| l.contains(PAYMENT_METHOD_REQUIRED)));

        let touched = FormData::new().with(PAYMENT_METHODS_FIELD, Vec::<String>::new());
        assert!(rendered(&view, &touched).iter().any(|l| l.contains(PAYMENT_METHOD_REQUIRED)));
    }

    #[test]
    fn restores_selection_from_data() {
        let data = FormData::new().with(PAYMENT_METHODS_FIELD, vec!["ideal".to_string()]);
        let view = PaymentMethodsView::new(&data).with_tip("later meer");
        let lines = rendered(&view, &data);
        assert!(lines.iter().any(|l| l.contains("[x] iDEAL")));
        assert!(lines.iter().any(|l| l == "  Tip: later meer"));
    }
}

use crate::core::step::StepKind;
use crate::core::value::FormData;
use crate::flows::catalog::{self, PAYMENT_METHODS_FIELD, PaymentMethodsView};
use crate::flows::view::{
    FieldEvent, FieldStack, StepProps, StepResponse, StepView, ViewedStep, read_only_key,
    summary_row,
};
use crate::input::{Input, TextInput};
use crate::terminal::KeyEvent;
use crate::ui::renderer::RenderFrame;
use crate::ui::span::{Span, SpanLine};
use crate::ui::theme::Theme;
use crate::validation::{self, MAX_DESCRIPTION_LENGTH, MIN_DESCRIPTION_LENGTH};
use serde::{Deserialize, Serialize};

pub const TITLE: &str = "Nieuw betaalverzoek";
pub const SUBTITLE: &str = "Maak in een paar stappen je verzoek aan";

pub const AMOUNT_FIELD: &str = "amount";
pub const DESCRIPTION_FIELD: &str = "description";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStep {
    Amount,
    Description,
    PaymentMethods,
    DraftPreview,
    RequestCreated,
}

pub const STEPS: [RequestStep; 5] = [
    RequestStep::Amount,
    RequestStep::Description,
    RequestStep::PaymentMethods,
    RequestStep::DraftPreview,
    RequestStep::RequestCreated,
];

impl StepKind for RequestStep {
    type Data = FormData;

    fn id(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Description => "description",
            Self::PaymentMethods => "payment-methods",
            Self::DraftPreview => "draft-preview",
            Self::RequestCreated => "request-created",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Amount => "Bedrag",
            Self::Description => "Omschrijving",
            Self::PaymentMethods => "Betaalmethodes",
            Self::DraftPreview => "Bijna klaar",
            Self::RequestCreated => "Voltooid",
        }
    }

    fn description(&self) -> Option<&'static str> {
        Some(match self {
            Self::Amount => "Hoeveel wil je vragen?",
            Self::Description => "Waar is het verzoek voor?",
            Self::PaymentMethods => "Hoe kunnen klanten betalen?",
            Self::DraftPreview => "Controleer je verzoek",
            Self::RequestCreated => "Verzoek aangemaakt",
        })
    }

    fn can_proceed(&self, data: &FormData) -> bool {
        match self {
            Self::Amount => validation::is_valid_amount(data.text(AMOUNT_FIELD)),
            Self::Description => validation::description_within_bounds(data.text(DESCRIPTION_FIELD)),
            Self::PaymentMethods => !data.list(PAYMENT_METHODS_FIELD).is_empty(),
            Self::DraftPreview | Self::RequestCreated => true,
        }
    }
}

impl ViewedStep for RequestStep {
    fn view(&self, data: &FormData) -> Box<dyn StepView<FormData>> {
        match self {
            Self::Amount => Box::new(AmountView::new(data)),
            Self::Description => Box::new(DescriptionView::new(data)),
            Self::PaymentMethods => Box::new(PaymentMethodsView::new(data)),
            Self::DraftPreview => Box::new(SummaryView { created: false }),
            Self::RequestCreated => Box::new(SummaryView { created: true }),
        }
    }
}

/// Typed view of the collected request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRequestForm {
    pub amount: String,
    pub description: String,
    pub payment_methods: Vec<String>,
}

impl CreateRequestForm {
    pub fn amount_value(&self) -> Option<f64> {
        validation::parse_amount(&self.amount)
    }

    pub fn formatted_amount(&self) -> String {
        validation::format_eur(self.amount_value().unwrap_or(0.0))
    }
}

fn formatted_amount(data: &FormData) -> String {
    validation::format_eur(validation::parse_amount(data.text(AMOUNT_FIELD)).unwrap_or(0.0))
}

struct AmountView {
    fields: FieldStack,
}

impl AmountView {
    fn new(data: &FormData) -> Self {
        let input = TextInput::new(AMOUNT_FIELD, "Bedrag (€)")
            .with_value(data.text(AMOUNT_FIELD))
            .with_placeholder("0,00")
            .with_hint("Minimum: €0.01 - Maximum: €10.000")
            .with_validator(validation::amount());
        let fields: Vec<Box<dyn Input>> = vec![Box::new(input)];
        Self {
            fields: FieldStack::new(fields),
        }
    }
}

impl StepView<FormData> for AmountView {
    fn render(&self, props: &StepProps<'_, FormData>) -> RenderFrame {
        let theme = props.theme;
        let mut frame = self.fields.render(theme, props.errors);
        if let Some(amount) = validation::parse_amount(props.data.text(AMOUNT_FIELD))
            .filter(|amount| *amount > 0.0)
        {
            frame.push(SpanLine::new());
            frame.push(vec![
                Span::styled("  Je vraagt ", theme.muted),
                Span::styled(validation::format_eur(amount), theme.accent),
            ]);
        }
        frame
    }

    fn handle_key(&mut self, key: KeyEvent, _props: &StepProps<'_, FormData>) -> StepResponse<FormData> {
        match self.fields.handle_key(key) {
            FieldEvent::Changed { value, .. } => {
                let normalized = validation::normalize_amount(&value);
                if normalized != value {
                    self.fields.set_value(AMOUNT_FIELD, normalized.clone());
                }
                StepResponse::Change(FormData::new().with(AMOUNT_FIELD, normalized))
            }
            FieldEvent::Handled => StepResponse::Handled,
            FieldEvent::Submit => StepResponse::Next,
            FieldEvent::Ignored => StepResponse::Ignored,
        }
    }
}

struct DescriptionView {
    fields: FieldStack,
}

impl DescriptionView {
    fn new(data: &FormData) -> Self {
        let input = TextInput::new(DESCRIPTION_FIELD, "Omschrijving")
            .with_value(data.text(DESCRIPTION_FIELD))
            .with_placeholder("Bijvoorbeeld: Oppassen op 27 juli van 19:00 tot 23:00")
            .with_hint(format!("Minimaal {MIN_DESCRIPTION_LENGTH} karakters"))
            .with_counter(MAX_DESCRIPTION_LENGTH)
            .with_validator(validation::description());
        let fields: Vec<Box<dyn Input>> = vec![Box::new(input)];
        Self {
            fields: FieldStack::new(fields),
        }
    }
}

impl StepView<FormData> for DescriptionView {
    fn render(&self, props: &StepProps<'_, FormData>) -> RenderFrame {
        let theme = props.theme;
        let mut frame = self.fields.render(theme, props.errors);
        let description = props.data.text(DESCRIPTION_FIELD);
        if validation::description_within_bounds(description) {
            frame.push(SpanLine::new());
            frame.push(vec![Span::styled("  Voorbeeld betaalpagina:", theme.muted)]);
            frame.push(vec![Span::styled(format!("    {description}"), theme.focused)]);
            frame.push(vec![Span::styled(
                format!("    {}", formatted_amount(props.data)),
                theme.accent,
            )]);
        }
        frame
    }

    fn handle_key(&mut self, key: KeyEvent, _props: &StepProps<'_, FormData>) -> StepResponse<FormData> {
        match self.fields.handle_key(key) {
            FieldEvent::Changed { value, .. } => {
                StepResponse::Change(FormData::new().with(DESCRIPTION_FIELD, value))
            }
            FieldEvent::Handled => StepResponse::Handled,
            FieldEvent::Submit => StepResponse::Next,
            FieldEvent::Ignored => StepResponse::Ignored,
        }
    }
}

struct SummaryView {
    created: bool,
}

fn request_overview(data: &FormData, theme: &Theme) -> Vec<SpanLine> {
    let methods = catalog::labels(data.list(PAYMENT_METHODS_FIELD)).join(", ");
    vec![
        vec![Span::styled("Verzoek overzicht", theme.title)],
        summary_row("Omschrijving", data.text(DESCRIPTION_FIELD), theme),
        summary_row("Bedrag", formatted_amount(data), theme),
        summary_row("Betaalmethodes", methods, theme),
    ]
}

impl StepView<FormData> for SummaryView {
    fn render(&self, props: &StepProps<'_, FormData>) -> RenderFrame {
        let theme = props.theme;
        let mut lines = Vec::new();
        if self.created {
            lines.push(vec![Span::styled("Verzoek aangemaakt!", theme.success)]);
            lines.push(vec![Span::styled(
                "Je betaalverzoek is succesvol aangemaakt en kan nu gedeeld worden.",
                theme.muted,
            )]);
        } else {
            lines.push(vec![Span::styled(
                "Controleer je betaalverzoek voordat je het definitief maakt",
                theme.muted,
            )]);
        }
        lines.push(SpanLine::new());
        lines.extend(request_overview(props.data, theme));
        if !self.created {
            lines.push(SpanLine::new());
            lines.push(vec![Span::styled(
                "Of klik op \"Voltooien\" om het verzoek definitief te maken",
                theme.hint,
            )]);
        }
        RenderFrame::new(lines)
    }

    fn handle_key(&mut self, key: KeyEvent, _props: &StepProps<'_, FormData>) -> StepResponse<FormData> {
        read_only_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::{AMOUNT_FIELD, CreateRequestForm, DESCRIPTION_FIELD, RequestStep, STEPS};
    use crate::core::errors::WizardErrors;
    use crate::core::step::{StepKind, wizard_id};
    use crate::core::value::FormData;
    use crate::flows::catalog::PAYMENT_METHODS_FIELD;
    use crate::flows::view::{StepProps, StepResponse, ViewedStep};
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::ui::span::line_text;
    use crate::ui::theme::Theme;

    fn amount(raw: &str) -> FormData {
        FormData::new().with(AMOUNT_FIELD, raw)
    }

    fn render(step: RequestStep, data: &FormData) -> Vec<String> {
        let errors = WizardErrors::new();
        let theme = Theme::default_theme();
        let props = StepProps {
            data,
            can_proceed: step.can_proceed(data),
            is_loading: false,
            can_skip: false,
            errors: &errors,
            theme: &theme,
        };
        step.view(data)
            .render(&props)
            .lines
            .iter()
            .map(|line| line_text(line))
            .collect()
    }

    #[test]
    fn registry_id_is_stable() {
        assert_eq!(
            wizard_id(&STEPS),
            "wizard-amount-description-payment-methods-draft-preview-request-created"
        );
    }

    #[test]
    fn amount_gate() {
        assert!(RequestStep::Amount.can_proceed(&amount("22.50")));
        assert!(!RequestStep::Amount.can_proceed(&amount("0")));
        assert!(!RequestStep::Amount.can_proceed(&amount("15000")));
        assert!(!RequestStep::Amount.can_proceed(&FormData::new()));
    }

    #[test]
    fn description_gate() {
        let with = |text: String| FormData::new().with(DESCRIPTION_FIELD, text);
        assert!(!RequestStep::Description.can_proceed(&with("ab".to_string())));
        assert!(RequestStep::Description.can_proceed(&with("a".repeat(100))));
        assert!(!RequestStep::Description.can_proceed(&with("a".repeat(101))));
    }

    #[test]
    fn payment_method_gate_and_open_steps() {
        let none = FormData::new().with(PAYMENT_METHODS_FIELD, Vec::<String>::new());
        let one = FormData::new().with(PAYMENT_METHODS_FIELD, vec!["tikkie".to_string()]);
        assert!(!RequestStep::PaymentMethods.can_proceed(&none));
        assert!(RequestStep::PaymentMethods.can_proceed(&one));
        assert!(RequestStep::DraftPreview.can_proceed(&FormData::new()));
        assert!(RequestStep::RequestCreated.can_proceed(&FormData::new()));
    }

    #[test]
    fn amount_view_normalizes_typed_input() {
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
        let mut view = RequestStep::Amount.view(&data);
        let mut last = StepResponse::Ignored;
        for ch in "22,5".chars() {
            last = view.handle_key(KeyEvent::plain(KeyCode::Char(ch)), &props);
        }
        assert_eq!(last, StepResponse::Change(amount("22.5")));
        assert_eq!(view.handle_key(KeyEvent::plain(KeyCode::Enter), &props), StepResponse::Next);
    }

    #[test]
    fn amount_view_previews_formatted_amount() {
        let lines = render(RequestStep::Amount, &amount("1234.5"));
        assert!(lines.contains(&"  Je vraagt € 1.234,50".to_string()));
        assert!(!render(RequestStep::Amount, &FormData::new())
            .iter()
            .any(|line| line.contains("Je vraagt")));
    }

    #[test]
    fn draft_preview_lists_the_request() {
        let data = amount("22.50")
            .with(DESCRIPTION_FIELD, "Oppassen op 27 juli")
            .with(PAYMENT_METHODS_FIELD, vec!["paypal".to_string(), "tikkie".to_string()]);
        let lines = render(RequestStep::DraftPreview, &data);
        assert!(lines.contains(&"Verzoek overzicht".to_string()));
        assert!(lines.contains(&"  Omschrijving: Oppassen op 27 juli".to_string()));
        assert!(lines.contains(&"  Bedrag: € 22,50".to_string()));
        assert!(lines.contains(&"  Betaalmethodes: Tikkie, PayPal".to_string()));

        let created = render(RequestStep::RequestCreated, &data);
        assert_eq!(created[0], "Verzoek aangemaakt!");
    }

    #[test]
    fn decodes_typed_form() {
        let data = amount("22.50")
            .with(DESCRIPTION_FIELD, "Oppassen")
            .with(PAYMENT_METHODS_FIELD, vec!["ideal".to_string()]);
        let form: CreateRequestForm = data.to_form().expect("decode");
        assert_eq!(form.payment_methods, vec!["ideal".to_string()]);
        assert_eq!(form.amount_value(), Some(22.5));
        assert_eq!(form.formatted_amount(), "€ 22,50");

        let empty: CreateRequestForm = FormData::new().to_form().expect("decode");
        assert_eq!(empty, CreateRequestForm::default());
    }
}

use crate::core::step::StepKind;
use crate::core::value::FormData;
use crate::flows::catalog::{PAYMENT_METHODS_FIELD, PaymentMethodsView};
use crate::flows::view::{
    FieldEvent, FieldStack, StepProps, StepResponse, StepView, ViewedStep, read_only_key,
    summary_row,
};
use crate::input::{Input, TextInput};
use crate::terminal::KeyEvent;
use crate::ui::renderer::RenderFrame;
use crate::ui::span::{Span, SpanLine};
use crate::validation::{self, MIN_NAME_LENGTH};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const TITLE: &str = "Welkom bij Velto";
pub const SUBTITLE: &str = "Laten we je account instellen";

pub const FIRST_NAME_FIELD: &str = "firstName";
pub const LAST_NAME_FIELD: &str = "lastName";
pub const EMAIL_FIELD: &str = "email";
pub const PHONE_FIELD: &str = "phone";
pub const COMPANY_FIELD: &str = "company";
pub const CONNECTED_ACCOUNTS_FIELD: &str = "connectedAccounts";

const SETUP_TIP: &str =
    "Je kunt later altijd meer betaalmethodes toevoegen of account informatie bijwerken in je profiel.";

const TIPS: [(&str, &str); 4] = [
    (
        "Snel verzoeken maken",
        "Maak in 30 seconden een betaalverzoek met onze wizard",
    ),
    ("Deel gemakkelijk", "Deel via WhatsApp, e-mail of kopieer de link"),
    (
        "Meerdere betaalmethodes",
        "Klanten kunnen kiezen hoe ze willen betalen",
    ),
    (
        "Overzicht behouden",
        "Zie al je verzoeken en betalingen in één dashboard",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    PersonalInfo,
    PaymentMethodsSetup,
    ProfileCustomization,
    WelcomeTutorial,
}

pub const STEPS: [OnboardingStep; 4] = [
    OnboardingStep::PersonalInfo,
    OnboardingStep::PaymentMethodsSetup,
    OnboardingStep::ProfileCustomization,
    OnboardingStep::WelcomeTutorial,
];

impl StepKind for OnboardingStep {
    type Data = FormData;

    fn id(&self) -> &'static str {
        match self {
            Self::PersonalInfo => "personal-info",
            Self::PaymentMethodsSetup => "payment-methods-setup",
            Self::ProfileCustomization => "profile-customization",
            Self::WelcomeTutorial => "welcome-tutorial",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::PersonalInfo => "Persoonlijk",
            Self::PaymentMethodsSetup => "Betaalmethodes",
            Self::ProfileCustomization => "Profiel",
            Self::WelcomeTutorial => "Welkom",
        }
    }

    fn description(&self) -> Option<&'static str> {
        Some(match self {
            Self::PersonalInfo => "Jouw gegevens",
            Self::PaymentMethodsSetup => "Kies je opties",
            Self::ProfileCustomization => "Personaliseer",
            Self::WelcomeTutorial => "Je bent klaar!",
        })
    }

    fn can_skip(&self) -> bool {
        matches!(self, Self::ProfileCustomization)
    }

    fn can_proceed(&self, data: &FormData) -> bool {
        match self {
            Self::PersonalInfo => validation::personal_info_complete(
                data.text(FIRST_NAME_FIELD),
                data.text(LAST_NAME_FIELD),
                data.text(EMAIL_FIELD),
                Some(data.text(PHONE_FIELD)),
            ),
            Self::PaymentMethodsSetup => !data.list(PAYMENT_METHODS_FIELD).is_empty(),
            Self::ProfileCustomization | Self::WelcomeTutorial => true,
        }
    }
}

impl ViewedStep for OnboardingStep {
    fn view(&self, data: &FormData) -> Box<dyn StepView<FormData>> {
        match self {
            Self::PersonalInfo => Box::new(PersonalInfoView::new(data)),
            Self::PaymentMethodsSetup => Box::new(PaymentMethodsView::new(data).with_tip(SETUP_TIP)),
            Self::ProfileCustomization => Box::new(ProfileView),
            Self::WelcomeTutorial => Box::new(WelcomeView),
        }
    }
}

/// Seed record: an empty method selection and no connected accounts.
pub fn initial_data() -> FormData {
    FormData::new()
        .with(PAYMENT_METHODS_FIELD, Vec::<String>::new())
        .with(CONNECTED_ACCOUNTS_FIELD, IndexMap::<String, String>::new())
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub payment_methods: Vec<String>,
    pub connected_accounts: IndexMap<String, String>,
}

impl OnboardingForm {
    /// Decodes the record; blank optional fields become `None`.
    pub fn from_data(data: &FormData) -> Result<Self, serde_json::Error> {
        let mut form: Self = data.to_form()?;
        form.phone = form.phone.filter(|phone| !phone.trim().is_empty());
        form.company = form.company.filter(|company| !company.trim().is_empty());
        Ok(form)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// What customers see on a payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePreview {
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar: String,
}

impl ProfilePreview {
    pub fn from_data(data: &FormData) -> Self {
        let first = data.text(FIRST_NAME_FIELD);
        let last = data.text(LAST_NAME_FIELD);
        let names = format!("{first} {last}").trim().to_string();
        let company = data.text(COMPANY_FIELD).trim();
        let (display_name, bio) = if company.is_empty() {
            (names, None)
        } else {
            (company.to_string(), Some(names))
        };
        Self {
            display_name,
            bio,
            avatar: validation::initials(first, last),
        }
    }
}

struct PersonalInfoView {
    fields: FieldStack,
}

impl PersonalInfoView {
    fn new(data: &FormData) -> Self {
        let name_message = |label: &str| format!("{label} moet minimaal {MIN_NAME_LENGTH} karakters bevatten");
        let fields: Vec<Box<dyn Input>> = vec![
            Box::new(
                TextInput::new(FIRST_NAME_FIELD, "Voornaam *")
                    .with_value(data.text(FIRST_NAME_FIELD))
                    .with_placeholder("Jan")
                    .with_validator(validation::min_length(MIN_NAME_LENGTH, name_message("Voornaam"))),
            ),
            Box::new(
                TextInput::new(LAST_NAME_FIELD, "Achternaam *")
                    .with_value(data.text(LAST_NAME_FIELD))
                    .with_placeholder("Jansen")
                    .with_validator(validation::min_length(MIN_NAME_LENGTH, name_message("Achternaam"))),
            ),
            Box::new(
                TextInput::new(EMAIL_FIELD, "E-mailadres *")
                    .with_value(data.text(EMAIL_FIELD))
                    .with_placeholder("jan@voorbeeld.nl")
                    .with_validator(validation::email()),
            ),
            Box::new(
                TextInput::new(PHONE_FIELD, "Telefoonnummer (optioneel)")
                    .with_value(data.text(PHONE_FIELD))
                    .with_placeholder("+31 6 12345678")
                    .with_validator(validation::phone()),
            ),
            Box::new(
                TextInput::new(COMPANY_FIELD, "Bedrijf (optioneel)")
                    .with_value(data.text(COMPANY_FIELD))
                    .with_placeholder("Mijn Bedrijf BV")
                    .with_hint("Handig voor freelancers en zzp'ers"),
            ),
        ];
        Self {
            fields: FieldStack::new(fields),
        }
    }
}

impl StepView<FormData> for PersonalInfoView {
    fn render(&self, props: &StepProps<'_, FormData>) -> RenderFrame {
        let theme = props.theme;
        let mut frame = RenderFrame::new(vec![
            vec![Span::styled("Persoonlijke gegevens", theme.title)],
            vec![Span::styled(
                "Vertel ons iets over jezelf om je account in te stellen",
                theme.muted,
            )],
            SpanLine::new(),
        ]);
        frame.append(self.fields.render(theme, props.errors));

        let phone = props.data.text(PHONE_FIELD);
        if !phone.trim().is_empty() && validation::is_valid_phone(phone) {
            frame.push(SpanLine::new());
            frame.push(vec![Span::styled(
                format!("  Geformatteerd: {}", validation::format_phone(phone)),
                theme.success,
            )]);
        }
        frame
    }

    fn handle_key(&mut self, key: KeyEvent, _props: &StepProps<'_, FormData>) -> StepResponse<FormData> {
        match self.fields.handle_key(key) {
            FieldEvent::Changed { id, value } => StepResponse::Change(FormData::new().with(id, value)),
            FieldEvent::Handled => StepResponse::Handled,
            FieldEvent::Submit => StepResponse::Next,
            FieldEvent::Ignored => StepResponse::Ignored,
        }
    }
}

struct ProfileView;

impl StepView<FormData> for ProfileView {
    fn render(&self, props: &StepProps<'_, FormData>) -> RenderFrame {
        let theme = props.theme;
        let preview = ProfilePreview::from_data(props.data);
        let mut lines = vec![
            vec![Span::styled("Profiel voorbeeld", theme.title)],
            vec![Span::styled("Zo zien klanten jouw betaalverzoeken", theme.muted)],
            SpanLine::new(),
            vec![
                Span::styled(format!("  ({}) ", preview.avatar), theme.accent),
                Span::styled(preview.display_name, theme.focused),
            ],
        ];
        if let Some(bio) = preview.bio {
            lines.push(vec![Span::styled(format!("       {bio}"), theme.muted)]);
        }
        lines.push(SpanLine::new());
        lines.push(vec![Span::styled(
            "  Je kunt dit later altijd aanpassen bij branding.",
            theme.hint,
        )]);
        RenderFrame::new(lines)
    }

    fn handle_key(&mut self, key: KeyEvent, _props: &StepProps<'_, FormData>) -> StepResponse<FormData> {
        read_only_key(key)
    }
}

struct WelcomeView;

impl StepView<FormData> for WelcomeView {
    fn render(&self, props: &StepProps<'_, FormData>) -> RenderFrame {
        let theme = props.theme;
        let data = props.data;
        let mut lines = vec![
            vec![Span::styled("Welkom bij Velto!", theme.success)],
            vec![Span::styled(
                format!(
                    "Je account is klaar, {}! Hier zijn een paar tips om te beginnen.",
                    data.text(FIRST_NAME_FIELD)
                ),
                theme.muted,
            )],
            SpanLine::new(),
            vec![Span::styled("Account overzicht", theme.title)],
            summary_row(
                "Naam",
                format!("{} {}", data.text(FIRST_NAME_FIELD), data.text(LAST_NAME_FIELD)),
                theme,
            ),
            summary_row("E-mail", data.text(EMAIL_FIELD), theme),
        ];
        let phone = data.text(PHONE_FIELD);
        if !phone.trim().is_empty() {
            lines.push(summary_row("Telefoon", validation::format_phone(phone), theme));
        }
        let company = data.text(COMPANY_FIELD);
        if !company.trim().is_empty() {
            lines.push(summary_row("Bedrijf", company, theme));
        }
        lines.push(summary_row(
            "Betaalmethodes",
            format!("{} geselecteerd", data.list(PAYMENT_METHODS_FIELD).len()),
            theme,
        ));

        lines.push(SpanLine::new());
        lines.push(vec![Span::styled("Tips voor succes", theme.title)]);
        for (title, description) in TIPS {
            lines.push(vec![
                Span::styled(format!("  • {title}: "), theme.focused),
                Span::styled(description, theme.muted),
            ]);
        }
        RenderFrame::new(lines)
    }

    fn handle_key(&mut self, key: KeyEvent, _props: &StepProps<'_, FormData>) -> StepResponse<FormData> {
        read_only_key(key)
    }
}

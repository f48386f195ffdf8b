use clap::{Parser, Subcommand};
use std::cell::Cell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use velto::config::{APP_NAME, APP_TAGLINE, AppConfig, ConfigError, WizardVariant, storage_keys};
use velto::core::errors::{CompletionError, WizardError};
use velto::core::step::StepKind;
use velto::core::value::FormData;
use velto::core::wizard::{Wizard, WizardBuilder};
use velto::flows::view::ViewedStep;
use velto::flows::{onboarding, request};
use velto::flows::{CreateRequestForm, OnboardingForm, OnboardingStep, RequestStep};
use velto::logging;
use velto::runtime::{self, RunOutcome, WizardSession};
use velto::storage::{JsonFileStore, KeyValueStore, StorageError};
use velto::terminal::Terminal;
use velto::ui::navigation::NavOptions;
use velto::ui::renderer::FrameOptions;
use velto::ui::theme::Theme;

const REQUEST_LATENCY: Duration = Duration::from_millis(1000);
const ONBOARDING_LATENCY: Duration = Duration::from_millis(1500);
const SIMULATED_FAILURE: &str = "Netwerkfout (gesimuleerd)";

#[derive(Parser)]
#[command(name = "velto")]
#[command(about = "Velto - betaalverzoeken in een paar stappen")]
struct Cli {
    #[command(subcommand)]
    command: FlowCommand,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for saved progress and the log file
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Layout of progress and navigation
    #[arg(long, value_enum, global = true)]
    variant: Option<WizardVariant>,

    /// Fail the first completion attempt
    #[arg(long, global = true)]
    simulate_failure: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum FlowCommand {
    /// Create a payment request
    Request,
    /// Set up a new account
    Onboarding,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.storage_dir.clone() {
        config.storage.dir = Some(dir);
    }
    if let Some(variant) = cli.variant {
        config.wizard.variant = variant;
    }

    logging::init_tracing(&config.log, &config.log_file())?;
    let store: Rc<dyn KeyValueStore> = Rc::new(JsonFileStore::open(config.storage.resolved_dir())?);
    info!(command = command_name(cli.command), "starting {}", APP_NAME);

    match cli.command {
        FlowCommand::Request => {
            let wizard = request_wizard(&config, &store, cli.simulate_failure)?;
            let outcome = run_session(wizard, frame_options(&config, request::TITLE, request::SUBTITLE)).await?;
            report(outcome, "Je betaalverzoek is aangemaakt.");
        }
        FlowCommand::Onboarding => {
            let wizard = onboarding_wizard(&config, &store, cli.simulate_failure)?;
            let outcome =
                run_session(wizard, frame_options(&config, onboarding::TITLE, onboarding::SUBTITLE)).await?;
            report(outcome, APP_TAGLINE);
        }
    }
    Ok(())
}

fn command_name(command: FlowCommand) -> &'static str {
    match command {
        FlowCommand::Request => "request",
        FlowCommand::Onboarding => "onboarding",
    }
}

fn with_common<S: StepKind<Data = FormData>>(
    builder: WizardBuilder<S>,
    config: &AppConfig,
    store: &Rc<dyn KeyValueStore>,
) -> WizardBuilder<S> {
    let builder = builder
        .on_cancel(|| info!("wizard cancelled by user"))
        .on_step_change(|index, data: &FormData| {
            info!(step = index, fields = data.len(), "step changed");
        });
    if config.wizard.auto_save {
        builder.auto_save(Rc::clone(store), config.wizard.auto_save_delay())
    } else {
        builder
    }
}

fn request_wizard(
    config: &AppConfig,
    store: &Rc<dyn KeyValueStore>,
    simulate_failure: bool,
) -> Result<Wizard<RequestStep>, WizardError> {
    let fail_next = Rc::new(Cell::new(simulate_failure));
    let builder = Wizard::builder(request::STEPS).on_complete(move |data: FormData| {
        let fail = fail_next.replace(false);
        async move {
            let form: CreateRequestForm = data
                .to_form()
                .map_err(|err| CompletionError::new(err.to_string()))?;
            tokio::time::sleep(REQUEST_LATENCY).await;
            if fail {
                return Err(CompletionError::new(SIMULATED_FAILURE));
            }
            info!(
                amount = %form.formatted_amount(),
                methods = form.payment_methods.len(),
                "payment request created"
            );
            Ok::<(), CompletionError>(())
        }
    });
    with_common(builder, config, store).build()
}

fn onboarding_wizard(
    config: &AppConfig,
    store: &Rc<dyn KeyValueStore>,
    simulate_failure: bool,
) -> Result<Wizard<OnboardingStep>, WizardError> {
    let fail_next = Rc::new(Cell::new(simulate_failure));
    let user_store = Rc::clone(store);
    let builder = Wizard::builder(onboarding::STEPS)
        .initial_data(onboarding::initial_data())
        .on_complete(move |data: FormData| {
            let fail = fail_next.replace(false);
            let store = Rc::clone(&user_store);
            async move {
                tokio::time::sleep(ONBOARDING_LATENCY).await;
                if fail {
                    return Err(CompletionError::new(SIMULATED_FAILURE));
                }
                let form = OnboardingForm::from_data(&data)
                    .map_err(|err| CompletionError::new(err.to_string()))?;
                let user = serde_json::to_value(&form).map_err(StorageError::from)?;
                store.set(storage_keys::USER, &user)?;
                info!(name = %form.full_name(), "account created");
                Ok::<(), CompletionError>(())
            }
        });
    with_common(builder, config, store).build()
}

fn frame_options(config: &AppConfig, title: &str, subtitle: &str) -> FrameOptions {
    let wizard = &config.wizard;
    FrameOptions {
        title: Some(title.to_string()),
        subtitle: Some(subtitle.to_string()),
        show_progress: wizard.show_progress,
        show_step_numbers: wizard.show_step_numbers,
        variant: wizard.variant,
        nav: NavOptions {
            allow_back_navigation: wizard.allow_back_navigation,
            show_cancel: true,
            variant: wizard.variant,
        },
    }
}

async fn run_session<S: ViewedStep>(wizard: Wizard<S>, options: FrameOptions) -> Result<RunOutcome, AppError> {
    let mut session = WizardSession::new(wizard, options, Theme::default_theme());
    let mut terminal = Terminal::new()?;
    Ok(runtime::run(&mut session, &mut terminal).await?)
}

fn report(outcome: RunOutcome, done: &str) {
    match outcome {
        RunOutcome::Completed => println!("{done}"),
        RunOutcome::Cancelled => println!("Geannuleerd."),
        RunOutcome::Exited => println!("Je voortgang is bewaard. Start opnieuw om verder te gaan."),
    }
}

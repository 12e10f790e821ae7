use clap::Args;
use coupon_core::config::{AppConfig, LoadOptions};
use coupon_core::domain::payload::parse_timestamp;
use coupon_core::{
    AuditContext, CouponDraft, CouponSubmitter, DateField, FlowTransitionError, FormState,
    Navigator, NoopAuditSink, NoopChangeListener, OutcomeReporter, RecordingSubmitter,
    SubmissionController, SubmissionOutcome, SubmitError, SystemClock, TextField,
    COUPON_CREATED_MESSAGE,
};
use tracing::{info, warn};

use crate::api::HttpCouponApi;
use crate::commands::CommandResult;

const COMMAND: &str = "create";

#[derive(Debug, Clone, Default, Args)]
pub struct CreateArgs {
    #[arg(long, help = "Coupon name")]
    pub name: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Discount rate in percent (0-100)")]
    pub discount_rate: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Maximum discount amount, separators allowed")]
    pub max_discount: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Number of coupons to issue")]
    pub total_quantity: Option<String>,
    #[arg(long, help = "Issue window start, YYYY-MM-DDTHH:mm:ss")]
    pub issue_start_at: Option<String>,
    #[arg(long, help = "Issue window end, YYYY-MM-DDTHH:mm:ss")]
    pub issue_end_at: Option<String>,
    #[arg(long, help = "Coupon expiration, YYYY-MM-DDTHH:mm:ss")]
    pub expiration_at: Option<String>,
    #[arg(long, help = "Run every check and print the payload without calling the API")]
    pub dry_run: bool,
}

/// Logs each outcome as it is reported; the command result carries it to stdout.
struct TracingOutcomeReporter;

impl OutcomeReporter for TracingOutcomeReporter {
    fn report(&self, outcome: &SubmissionOutcome) {
        if outcome.is_success() {
            info!(event_name = "coupon.cli.outcome", message = %outcome.message(), "outcome");
        } else {
            warn!(event_name = "coupon.cli.outcome", message = %outcome.message(), "outcome");
        }
    }
}

/// A one-shot command has no previous screen; leaving the workflow ends it.
struct CommandNavigator;

impl Navigator for CommandNavigator {
    fn go_back(&self) {
        info!(event_name = "coupon.cli.navigation_back", "leaving coupon creation workflow");
    }
}

pub fn run(args: CreateArgs, options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let draft = match build_draft(&args) {
        Ok(draft) => draft,
        Err(message) => return CommandResult::failure(COMMAND, "invalid_input", message, 4),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        if args.dry_run {
            return submit_draft(RecordingSubmitter::default(), &draft, &config).await;
        }
        match HttpCouponApi::new(&config.api) {
            Ok(api) => submit_draft(api, &draft, &config).await,
            Err(error) => Ok(SubmissionOutcome::Failed(SubmitError::Transport(error.to_string()))),
        }
    });

    match result {
        Ok(SubmissionOutcome::Created(payload)) => {
            let message = if args.dry_run {
                "dry run: coupon draft passed every check"
            } else {
                COUPON_CREATED_MESSAGE
            };
            let payload = serde_json::to_value(&payload).ok();
            CommandResult::success_with_payload(COMMAND, message, payload)
        }
        Ok(outcome @ SubmissionOutcome::Invalid(_)) => {
            CommandResult::failure(COMMAND, "validation", outcome.message(), 4)
        }
        Ok(outcome @ SubmissionOutcome::Failed(_)) => {
            CommandResult::failure(COMMAND, "submission", outcome.message(), 5)
        }
        Err(error) => CommandResult::failure(COMMAND, "flow", error.to_string(), 6),
    }
}

async fn submit_draft<S>(
    submitter: S,
    draft: &CouponDraft,
    config: &AppConfig,
) -> Result<SubmissionOutcome, FlowTransitionError>
where
    S: CouponSubmitter,
{
    let mut controller =
        SubmissionController::new(submitter, SystemClock, TracingOutcomeReporter, CommandNavigator)
            .with_dispatch_timeout(config.api.timeout())
            .with_audit(NoopAuditSink, AuditContext::generated("coupon-cli"));
    controller.submit(draft).await
}

/// Feeds every provided flag through the form exactly as typed input would be.
pub fn build_draft(args: &CreateArgs) -> Result<CouponDraft, String> {
    let mut form = FormState::new(NoopChangeListener);

    let text_fields = [
        (TextField::Name, &args.name),
        (TextField::DiscountRate, &args.discount_rate),
        (TextField::MaxDiscount, &args.max_discount),
        (TextField::TotalQuantity, &args.total_quantity),
    ];
    for (field, raw) in text_fields {
        if let Some(raw) = raw {
            form.set_field(field, raw);
        }
    }

    let date_fields = [
        (DateField::IssueStartAt, "--issue-start-at", &args.issue_start_at),
        (DateField::IssueEndAt, "--issue-end-at", &args.issue_end_at),
        (DateField::ExpirationAt, "--expiration-at", &args.expiration_at),
    ];
    for (field, flag, raw) in date_fields {
        let Some(raw) = raw else {
            continue;
        };
        let value = parse_timestamp(raw)
            .map_err(|_| format!("invalid {flag} `{raw}`: expected YYYY-MM-DDTHH:mm:ss"))?;
        form.set_date_field(field, Some(value));
    }

    Ok(form.draft().clone())
}

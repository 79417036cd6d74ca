use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use chrono::Utc;
use deployment_notifier_action::{
    api_client::Client, process, Report, Settings, SmtpMailer, StaticSecrets,
};
use deployment_notifier_core::{model::InvocationInputs, PROGRAM_NAME};
use snafu::ResultExt;
use tokio::runtime::Builder;

use crate::{
    config::Config,
    error::{self, Result},
    shadow::{BRANCH, PKG_VERSION, SHORT_COMMIT},
};

#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Path of the JSON inputs, `-` for stdin.
    pub inputs: PathBuf,

    pub dry_run: bool,

    pub html_output: Option<PathBuf>,
}

/// Handle one deployment event and print its outputs as JSON on stdout.
#[allow(clippy::result_large_err)]
pub fn run(config: Config, RunOptions { inputs, dry_run, html_output }: RunOptions) -> Result<()> {
    config.log.registry();

    tracing::info!(
        version = PKG_VERSION,
        commit = SHORT_COMMIT,
        branch = BRANCH,
        "{PROGRAM_NAME} is starting, pid: {}",
        std::process::id()
    );

    let settings = Settings { config: config.runtime_config()?, dry_run };
    let secrets = StaticSecrets::new(config.secrets);
    let inputs = read_inputs(&inputs)?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context(error::InitializeTokioRuntimeSnafu)?;

    let outcome = runtime.block_on(async {
        let api = Client::new(&settings.config.api, &inputs.vra_fqdn, &inputs.bearer_token)
            .map_err(deployment_notifier_action::Error::from)?;
        process(&api, &secrets, &SmtpMailer, &inputs, &settings, Utc::now()).await
    });

    let report = match outcome {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error);
            return Err(error.into());
        }
    };

    write_report(&report, html_output.as_deref())
}

fn read_inputs(path: &Path) -> Result<InvocationInputs> {
    let data = if path == Path::new("-") {
        let mut data = String::new();
        let _unused =
            io::stdin().read_to_string(&mut data).context(error::ReadInputsSnafu { path })?;
        data
    } else {
        std::fs::read_to_string(path).context(error::ReadInputsSnafu { path })?
    };

    serde_json::from_str(&data).context(error::ParseInputsSnafu { path })
}

fn write_report(report: &Report, html_output: Option<&Path>) -> Result<()> {
    if let Some(path) = html_output {
        std::fs::write(path, &report.email.html).context(error::WriteHtmlSnafu { path })?;
        tracing::info!("Rendered email written to {}", path.display());
    }

    match report.delivered {
        Some(true) => tracing::info!(to = %report.email.to, "Notification sent"),
        Some(false) => tracing::warn!(to = %report.email.to, "Notification was not delivered"),
        None => {}
    }

    let outputs =
        serde_json::to_string_pretty(&report.outputs).context(error::SerializeOutputsSnafu)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{outputs}").context(error::WriteStdoutSnafu)
}

mod api;
mod config;

use clap::{Args, Parser, Subcommand};
use doppler_canvas::camera::Viewport;
use doppler_canvas::params::{PathKind, PathParameters};
use doppler_canvas::playback::{PlaybackState, Preview};
use doppler_canvas::submit::{SimulationRequest, ValidationError};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::{ApiClient, ApiError, wait_for_job};
use crate::config::ClientConfig;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "doppler", about = "Doppler simulator path preview and job CLI")]
struct Cli {
    #[arg(long, env = "DOPPLER_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Service liveness check.
    Health,
    /// Service metadata.
    Info,
    /// List available vehicles.
    Vehicles,
    /// List path families and their parameter ranges.
    Paths {
        #[arg(long)]
        vehicle: Option<String>,
    },
    /// Validate and submit a simulation job.
    Simulate {
        #[arg(long)]
        vehicle: String,
        #[command(flatten)]
        path: PathArgs,
        /// Print the job id and return without polling.
        #[arg(long)]
        no_wait: bool,
    },
    /// Show the status of a job.
    Status { job_id: String },
    /// Print the download URL for a finished clip.
    DownloadUrl { filename: String },
    /// Print the autoscaled preview geometry as JSON.
    Preview {
        #[command(flatten)]
        path: PathArgs,
        #[arg(long, default_value_t = 400.0)]
        width: f64,
        #[arg(long, default_value_t = 300.0)]
        height: f64,
        /// Playback progress in [0, 1]; places the marker as if playing.
        #[arg(long)]
        progress: Option<f64>,
    },
}

/// Path family and its fields. Unset fields take their defaults.
#[derive(Args, Debug, Default)]
struct PathArgs {
    #[arg(long = "path", default_value = "straight")]
    kind: PathKind,
    /// Closest distance (straight) or vertex height (parabola), meters.
    #[arg(long)]
    h: Option<f64>,
    /// Straight path angle, degrees.
    #[arg(long, allow_hyphen_values = true)]
    angle: Option<f64>,
    /// Parabola curvature.
    #[arg(long)]
    a: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    x0: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y0: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    x1: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y1: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    x2: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y2: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    x3: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y3: Option<f64>,
    /// Vehicle speed, m/s.
    #[arg(long)]
    speed: Option<f64>,
    /// Clip length, seconds.
    #[arg(long = "duration")]
    audio_duration: Option<f64>,
}

impl PathArgs {
    /// The flags as a form record keyed by service field name.
    fn record(&self) -> Value {
        let fields = [
            ("h", self.h),
            ("angle", self.angle),
            ("a", self.a),
            ("x0", self.x0),
            ("y0", self.y0),
            ("x1", self.x1),
            ("y1", self.y1),
            ("x2", self.x2),
            ("y2", self.y2),
            ("x3", self.x3),
            ("y3", self.y3),
            ("speed", self.speed),
            ("audio_duration", self.audio_duration),
        ];
        let map: Map<String, Value> = fields
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key.to_owned(), Value::from(v))))
            .collect();
        Value::Object(map)
    }

    fn params(&self) -> PathParameters {
        PathParameters::from_fields(self.kind, &self.record())
    }
}

fn preview_for(path: &PathArgs, width: f64, height: f64, progress: Option<f64>) -> Preview {
    let playback = PlaybackState { is_playing: progress.is_some(), progress: progress.unwrap_or(0.0).clamp(0.0, 1.0) };
    Preview::build(&path.params(), Viewport::new(width, height), &playback)
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url);
    }

    run(cli.command, &config).await
}

async fn run(command: Command, config: &ClientConfig) -> Result<(), CliError> {
    let client = || ApiClient::new(config);
    match command {
        Command::Health => print_json(&client()?.health().await?),
        Command::Info => print_json(&client()?.info().await?),
        Command::Vehicles => print_json(&client()?.vehicles().await?),
        Command::Paths { vehicle } => print_json(&client()?.paths(vehicle.as_deref()).await?),
        Command::Status { job_id } => print_json(&client()?.job(&job_id).await?),
        Command::DownloadUrl { filename } => {
            println!("{}", client()?.download_url(&filename));
            Ok(())
        }
        Command::Simulate { vehicle, path, no_wait } => {
            run_simulate(config, &client()?, &vehicle, &path, no_wait).await
        }
        Command::Preview { path, width, height, progress } => print_json(&preview_for(&path, width, height, progress)),
    }
}

async fn run_simulate(
    config: &ClientConfig,
    client: &ApiClient,
    vehicle: &str,
    path: &PathArgs,
    no_wait: bool,
) -> Result<(), CliError> {
    let request = SimulationRequest::new(vehicle, &path.params());

    let catalog = client.paths(Some(vehicle)).await?;
    let specs = catalog
        .into_iter()
        .find(|info| info.id == request.path.as_str())
        .map(|info| info.parameters)
        .unwrap_or_default();
    request.validate(&specs)?;

    let job_id = client.simulate(&request).await?;
    if no_wait {
        return print_json(&serde_json::json!({ "job_id": job_id }));
    }

    let result = wait_for_job(client, &job_id, config.poll, |progress| {
        eprintln!("processing: {progress:.0}%");
    })
    .await?;
    let download_url = client.download_url(&result.filename);
    print_json(&serde_json::json!({ "job_id": job_id, "result": result, "download_url": download_url }))
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use anyhow::Result;
use ia_m_uv::config::Config;
use ia_m_uv::people;
use ia_m_uv::people::hog::{HogParams, HogPeopleDetector, VideoFileSource, WindowDisplay};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const WINDOW_TITLE: &str = "People Detection";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ia_m_uv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Reading video from {}", config.video_path.display());

    let mut source = match VideoFileSource::open(&config.video_path) {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            println!("Error opening camera/video");
            return Ok(());
        }
    };

    let mut detector = HogPeopleDetector::new(HogParams::default())?;
    let mut display = WindowDisplay::new(WINDOW_TITLE);

    let summary = people::run(&mut source, &mut detector, &mut display)?;
    if summary.read_failed {
        println!("Error capturing frame");
    }

    println!(
        "Total people detected in the video (sum over frames): {}",
        summary.total_detections
    );
    Ok(())
}

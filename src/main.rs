use garden_launcher::config::LauncherConfig;
use garden_launcher::launcher::Launcher;
use garden_launcher::runner::SystemRunner;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("🌱 Garden Guardian Backend Setup");
    println!("{}", "=".repeat(40));

    let config = LauncherConfig::load().unwrap_or_default();
    let mut launcher = Launcher::new(config, SystemRunner);

    if let Err(e) = launcher.run().await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    // Nothing left to drive here: exit happens in the interrupt listener
    // (status 0) or above (status 1). A spontaneous server exit is logged
    // but leaves the launcher resident.
    launcher.idle().await;
}

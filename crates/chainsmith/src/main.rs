//! ChainSmith - waveform viewer and sample-chain preparation

use chainsmith::ui::ChainSmithApp;

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for cache and zoom tracing
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("chainsmith starting up");

    iced::application(ChainSmithApp::new, ChainSmithApp::update, ChainSmithApp::view)
        .title(ChainSmithApp::title)
        .subscription(ChainSmithApp::subscription)
        .theme(ChainSmithApp::theme)
        .window_size(iced::Size::new(800.0, 480.0))
        .run()
}

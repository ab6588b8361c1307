use std::process;

pub mod config;
pub mod crawler;
pub mod declare;
pub mod error;
pub mod event;
pub mod logging;
pub mod mailer;
pub mod report;
pub mod util;

use crate::config::SETTINGS;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    logging::info_console("Starting Fuel Price Monitor".to_string());

    if let Err(why) = event::fuel_price::execute(&SETTINGS).await {
        logging::error_file_async(format!("Fuel price report failed because {:?}", why));
        logging::error_console(format!("Application failed: {}", why));
        process::exit(1);
    }

    logging::info_console("Fuel price report completed successfully".to_string());
}

use campus_fee_server::{
    cli::{display_help, parse_command_line_args, Command},
    config::ServerConfig,
    server::run_server,
};
use campus_fee_engine::{ProvisioningApi, SqliteDatabase};
use dotenvy::dotenv;
use log::info;

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    match parse_command_line_args() {
        Command::Help => display_help(),
        Command::ProvisionAdmin { reg_no, name } => provision_admin(&reg_no, &name).await,
        Command::Serve => {
            let config = ServerConfig::from_env_or_default();
            info!("🚀️ Starting server on {}:{}", config.host, config.port);
            match run_server(config).await {
                Ok(_) => println!("Bye!"),
                Err(e) => eprintln!("{e}"),
            }
        },
    }
}

async fn provision_admin(reg_no: &str, name: &str) {
    let config = ServerConfig::from_env_or_default();
    let db = match SqliteDatabase::new_with_url(&config.database_url, 2).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Could not open the database at {}: {e}", config.database_url);
            return;
        },
    };
    let api = ProvisioningApi::new(db);
    match api.provision_admin(reg_no, name).await {
        Ok(true) => println!("Admin account {reg_no} created."),
        Ok(false) => println!("Admin account {reg_no} already exists. Nothing to do."),
        Err(e) => eprintln!("Could not provision the admin account: {e}"),
    }
}

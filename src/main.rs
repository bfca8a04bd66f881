//! Portfolio CMS - 双语作品集站点服务
//!
//! Usage:
//! - Normal mode: `portfolio-cms`
//! - With custom port: `portfolio-cms --port 8080`
//! - Serve a built frontend: `portfolio-cms --static-dir ./dist`

use std::path::PathBuf;

use portfolio_cms::RuntimeConfig;

/// 解析命令行参数
fn parse_args() -> RuntimeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RuntimeConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                config.port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--static-dir" if i + 1 < args.len() => {
                config.static_dir_override = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("Portfolio CMS - 双语作品集站点服务");
    println!();
    println!("USAGE:");
    println!("    portfolio-cms [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>          Override the listening port");
    println!("    --static-dir <DIR>     Serve static files from DIR for unmatched paths");
    println!("    -h, --help             Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    BACKEND_URL            Backend project URL (or SUPABASE_URL)");
    println!("    BACKEND_ANON_KEY       Backend public key (or SUPABASE_ANON_KEY)");
    println!("    STORAGE_BUCKET         Storage bucket for uploads (default: portfolio)");
    println!("    ADMIN_EMAILS           Comma-separated admin allowlist");
    println!("    LOG_FORMAT=json        Emit JSON logs");
}

fn main() {
    let config = parse_args();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(portfolio_cms::init_and_run_with_config(config)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

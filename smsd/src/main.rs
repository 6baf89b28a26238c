//! # SMS Composer Daemon
//!
//! Main entry point for the host runtime.

use smsd::logging::init_logging;
use smsd::{load_config, HostRuntime, HostRuntimeConfig};
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    init_logging();

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(&args[0]);
        process::exit(1);
    });

    let mut runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to create runtime: {}", e);
        process::exit(1);
    });

    runtime.run();

    print!("{}", runtime.frame());
    println!();
    println!("Sent messages: {}", runtime.sent().len());
    for message in runtime.sent() {
        println!("  {} {:?}", message.id, message.body);
    }
    if runtime.failed_sends() > 0 {
        println!("Failed sends: {}", runtime.failed_sends());
    }
}

fn parse_args(args: &[String]) -> Result<HostRuntimeConfig, String> {
    let mut config = HostRuntimeConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config.composer = load_config(Path::new(&args[i])).map_err(|e| e.to_string())?;
            }
            "--script" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --script".to_string());
                }
                let script_text = fs::read_to_string(&args[i])
                    .map_err(|e| format!("Failed to read script file: {}", e))?;
                config.script = Some(script_text);
            }
            "--poll-ms" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --poll-ms".to_string());
                }
                config.poll_ms = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid poll-ms value: {}", args[i]))?;
            }
            "--max-steps" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --max-steps".to_string());
                }
                config.max_steps = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid max-steps value: {}", args[i]))?;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>      Composer configuration (JSON)");
    eprintln!("  -s, --script <FILE>      Keypad script to play");
    eprintln!("  --poll-ms <N>            Simulated milliseconds per poll (default 10)");
    eprintln!("  --max-steps <N>          Maximum steps to run (0 = unlimited)");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SMSD_LOG                 Log filter (default info)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} --script scripts/hello.keys", program);
    eprintln!("  {} --config device.json --script scripts/hello.keys", program);
}

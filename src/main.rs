mod args;
mod report;

use clap::Parser;
use log::{info, warn, LevelFilter};
use snafu::ErrorCompat;

use crate::args::Args;
use crate::report::{run_report, ReportOverrides};

fn main() {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    info!("args: {:?}", args);

    let overrides = ReportOverrides {
        input: args.input.clone(),
        input_type: args.input_type.clone(),
        assembly: args.assembly.clone(),
        year: args.year,
        out: args.out.clone(),
    };

    let res = run_report(args.config.clone(), &overrides, args.reference.clone());
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}

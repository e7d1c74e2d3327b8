use std::io::{self, Read, Write};
use std::process;

use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt().init();

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        error!("failed to read stdin: {err}");
        process::exit(1);
    }

    info!("dispatching request document");
    match transit_atlas::handler::run(&input) {
        Ok(output) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let _ = writeln!(handle, "{output}");
        }
        Err(err) => {
            error!("failed to process request document: {err}");
            process::exit(1);
        }
    }
}

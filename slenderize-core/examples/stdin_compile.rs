//! Compile a view from stdin and print the composed output.
//!
//! Run with: cargo run --example stdin_compile < page.slim

use std::io::{self, Write};
use std::process::ExitCode;

use slenderize_core::compile;

fn main() -> ExitCode {
    match compile(io::stdin().lock()) {
        Ok(output) => {
            for fragment in output.fragments() {
                eprintln!("FRAGMENT: {:?}", fragment);
            }
            let _ = io::stdout().write_all(output.compose().as_bytes());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

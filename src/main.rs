//! # Tabula CLI
//!
//! Usage:
//!   tabula input.json -o output.pdf
//!   echo '{ ... }' | tabula -o output.pdf
//!   tabula --example > sales.json

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_table_json());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        match fs::read_to_string(&args[1]) {
            Ok(text) => text,
            Err(e) => fail(&format!("Failed to read {}: {}", args[1], e)),
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            fail(&format!("Failed to read stdin: {}", e));
        }
        buf
    };

    // Parse output path
    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "output.pdf".to_string());

    // Render
    match tabula::render_json(&input) {
        Ok(pdf_bytes) => {
            if let Err(e) = fs::write(&output_path, &pdf_bytes) {
                fail(&format!("Failed to write {}: {}", output_path, e));
            }
            eprintln!("✓ Written {} bytes to {}", pdf_bytes.len(), output_path);
        }
        Err(e) => fail(&format!("Failed to render table: {}", e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("✗ {}", message);
    process::exit(1);
}

fn example_table_json() -> &'static str {
    r##"{
  "metadata": {
    "title": "Quarterly Sales",
    "author": "Tabula"
  },
  "template": "striped",
  "table": {
    "colWidth": 110,
    "repeatHeaderRows": 1,
    "designConfig": {
      "fontSize": 10,
      "padding": "4 6"
    }
  },
  "cells": [
    ["Region", "Q1", "Q2", "Q3", "Total"],
    ["North", "12,400", "13,100", "12,950", "38,450"],
    ["South", "9,870", "10,220", "11,004", "31,094"],
    ["East", "15,310", "14,780", "16,020", "46,110"],
    ["West", "8,450", "9,015", "9,630", "27,095"],
    ["All regions", "", "", "", "142,749"]
  ],
  "styles": [
    { "row": 5, "col": 4, "style": { "fontWeight": "bold", "alignment": "right" } }
  ],
  "merges": [
    { "startRow": 5, "startCol": 0, "endRow": 5, "endCol": 3 }
  ]
}
"##
}

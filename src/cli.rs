use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use tunitales::parser::{self, Command};
use tunitales::server::IMAGE_FIELD;
use tunitales::{Monument, RecognitionOutcome, RecognitionResult};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Interactive client for the TuniTales service", long_about = None)]
struct CliArgs {
    /// Base URL of a running TuniTales server.
    #[clap(long, env = "TUNITALES_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,
}

struct ApiClient {
    http: Client,
    base: String,
}

fn main() {
    let args = CliArgs::parse();
    print_banner();

    let client = match ApiClient::new(&args.server) {
        Ok(client) => client,
        Err(e) => {
            println!("[\u{2717}] Could not build HTTP client: {}", e);
            return;
        }
    };

    match client.health() {
        Ok(()) => println!("[\u{2713}] Connected to TuniTales at {}!", client.base),
        Err(_) => {
            println!("[\u{2717}] Could not reach server at {}.", client.base);
            println!("    Make sure to run 'cargo run --release' in another terminal.");
            return;
        }
    }
    println!("Type 'HELP' for supported commands or 'EXIT' to quit.\n");

    let stdin = io::stdin();
    let mut buffer = String::new();

    loop {
        print!("tunitales> ");
        if io::stdout().flush().is_err() { break; }
        buffer.clear();

        match stdin.lock().read_line(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        if buffer.trim().is_empty() { continue; }

        match parser::parse_command(&buffer) {
            Ok(Command::Exit) => break,
            Ok(cmd) => {
                if let Err(e) = execute_command(&client, cmd) {
                    println!("[\u{26a0}\u{fe0f} Error] {}", e);
                }
            }
            Err(e) => {
                println!("[\u{2717} Syntax Error] {}", e);
                if buffer.to_uppercase().starts_with("CATEGORY") {
                    println!("    \u{2139}\u{fe0f}  Hint: Try 'CATEGORY \"Roman Era\"'");
                }
            }
        }
    }
}

fn print_banner() {
    println!("\n==================================================");
    println!("   TuniTales CLI - Tunisian Monument Explorer");
    println!("==================================================\n");
}

fn print_help() {
    println!("\n--- Available Commands ---");
    println!("1. LIST:        List every monument");
    println!("2. GET:         GET 3");
    println!("3. CATEGORY:    CATEGORY \"Islamic Architecture\"  (or \"All Monuments\")");
    println!("4. RECOGNIZE:   RECOGNIZE \"./photos/el_djem.jpg\"");
    println!("5. RESULTS:     List recognition results");
    println!("6. RESULT:      RESULT 1");
    println!("7. HEALTH:      Check the server");
    println!("8. EXIT:        Quit\n");
}

fn execute_command(client: &ApiClient, cmd: Command) -> Result<(), String> {
    match cmd {
        Command::Help => { print_help(); Ok(()) },
        Command::List => {
            let monuments: Vec<Monument> = client.get_json("/monuments")?;
            print_monument_list(&monuments);
            Ok(())
        },
        Command::Get { id } => {
            let monument: Monument = client.get_json(&format!("/monuments/{}", id))?;
            print_monument(&monument);
            Ok(())
        },
        Command::Category { name } => {
            let path = format!("/monuments/category/{}", encode_segment(&name));
            let monuments: Vec<Monument> = client.get_json(&path)?;
            print_monument_list(&monuments);
            Ok(())
        },
        Command::Recognize { path } => {
            let outcome = client.recognize(Path::new(&path))?;
            println!(
                "[\u{2713} Recognized] {} ({} confidence)",
                outcome.monument.name, outcome.recognition.confidence
            );
            println!("  Result #{} | image {}", outcome.recognition.id, outcome.recognition.image_url);
            println!("  {}\n", outcome.monument.description);
            Ok(())
        },
        Command::Results => {
            let results: Vec<RecognitionResult> = client.get_json("/recognition-results")?;
            println!("\n{} recognition result(s):", results.len());
            for r in &results {
                print_result(r);
            }
            println!();
            Ok(())
        },
        Command::Result { id } => {
            let result: RecognitionResult = client.get_json(&format!("/recognition-results/{}", id))?;
            print_result(&result);
            Ok(())
        },
        Command::Health => {
            client.health()?;
            println!("[\u{2713} OK] Server is healthy.");
            Ok(())
        },
        Command::Exit => Ok(()),
    }
}

fn print_monument_list(monuments: &[Monument]) {
    println!("\nFound {} monument(s):", monuments.len());
    for m in monuments {
        println!("  \u{2022} [{}] {} - {} ({})", m.id, m.name, m.location, m.category);
    }
    println!();
}

fn print_monument(m: &Monument) {
    println!("\n[{}] {}", m.id, m.name);
    println!("  Location:  {}", m.location);
    println!("  Category:  {} | Era: {}", m.category, m.era);
    println!("  Coords:    {:.4}, {:.4}", m.coordinates.lat, m.coordinates.lng);
    println!("  {}", m.description);
    println!("  Opening:   {}", m.details.visitor_info.opening_hours);
    println!("  Admission: {}\n", m.details.visitor_info.admission_fees);
}

fn print_result(r: &RecognitionResult) {
    println!(
        "  \u{2022} #{} monument {} at {} ({}) {}",
        r.id, r.monument_id, r.confidence, r.timestamp, r.image_url
    );
}

/// Percent-encodes a single path segment, so "Roman Era" survives the URL.
fn encode_segment(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment, percent_encoding::NON_ALPHANUMERIC).to_string()
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(|e| e.to_ascii_lowercase())
    .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

// --- NETWORK HANDLERS ---

impl ApiClient {
    fn new(base: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { http, base: base.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn health(&self) -> Result<(), String> {
        let body: serde_json::Value = self.get_json("/health")?;
        match body.get("status").and_then(|s| s.as_str()) {
            Some("ok") => Ok(()),
            _ => Err(format!("Unexpected health response: {}", body)),
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let resp = self.http.get(self.url(path)).send().map_err(|e| e.to_string())?;
        decode(resp)
    }

    fn recognize(&self, path: &Path) -> Result<RecognitionOutcome, String> {
        let bytes = std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
        let part = multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for(path))
        .map_err(|e| e.to_string())?;
        let form = multipart::Form::new().part(IMAGE_FIELD, part);

        let resp = self
        .http
        .post(self.url("/recognize"))
        .multipart(form)
        .send()
        .map_err(|e| e.to_string())?;
        decode(resp)
    }
}

/// Decodes a success body, or turns the server's `{"message": ...}` into an error.
fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, String> {
    let status = resp.status();
    if status.is_success() {
        return resp.json::<T>().map_err(|e| format!("Malformed response: {}", e));
    }
    let message = resp
    .json::<serde_json::Value>()
    .ok()
    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
    .unwrap_or_else(|| "no details".to_string());
    Err(format!("{} - {}", status, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.JPG", "image/jpeg")]
    #[case("a/b/c.png", "image/png")]
    #[case("scan.webp", "image/webp")]
    #[case("notes.txt", "application/octet-stream")]
    #[case("noext", "application/octet-stream")]
    fn mime_is_guessed_from_extension(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(mime_for(Path::new(path)), expected);
    }

    #[test]
    fn category_segments_are_encoded() {
        assert_eq!(encode_segment("Roman Era"), "Roman%20Era");
        assert_eq!(encode_segment("Islamic Architecture"), "Islamic%20Architecture");
    }
}

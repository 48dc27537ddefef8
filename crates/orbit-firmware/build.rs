//! Exports Wi-Fi credentials and device settings from `.env` (or the build
//! environment) as compile-time variables for `wifi_secrets`.

const EXPORTED: [&str; 5] = [
    "WIFI_SSID",
    "WIFI_PASSWORD",
    "UTC_OFFSET_SECS",
    "NTP_SERVER",
    "DISPLAY_MODE",
];

fn main() {
    println!("cargo:rerun-if-changed=.env");

    // A missing .env is fine when the variables come from the shell
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=.env not loaded: {e}");
    }

    for key in EXPORTED {
        println!("cargo:rerun-if-env-changed={key}");
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={key}={value}");
        }
    }
}

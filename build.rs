use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Cargar variables de entorno desde .env si existe
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                // KEY=VALUE, con comillas opcionales
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    // Solo configurar si no está ya definida en el entorno
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    } else {
        println!("cargo:warning=No .env file found. FIREBASE_API_KEY y FIREBASE_PROJECT_ID quedarán vacíos.");
    }

    for key in [
        "FIREBASE_API_KEY",
        "FIREBASE_PROJECT_ID",
        "FIRESTORE_BASE_URL",
        "IDENTITY_TOOLKIT_URL",
        "SECURE_TOKEN_URL",
        "EXPO_PUSH_URL",
        "ENABLE_LOGGING",
        "SCAN_COOLDOWN_MS",
        "SCAN_SUCCESS_COOLDOWN_MS",
        "NOTIFICATION_POLL_SECONDS",
    ] {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    println!("cargo:rerun-if-changed=build.rs");
}

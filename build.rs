fn main() {
    println!("cargo:rerun-if-env-changed=BUTTON_CONFIG_JSON");
    println!("cargo:rerun-if-env-changed=BUTTON_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=BUTTON_WIFI_PASSPHRASE");
    println!("cargo:rerun-if-env-changed=BUTTON_SERVER_HOST");
    println!("cargo:rerun-if-env-changed=BUTTON_SERVER_PATH");
    println!("cargo:rerun-if-env-changed=BUTTON_HTTP_VERSION");

    // Only the device build needs the ESP-IDF environment exported.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

use driftnet_config::BrowserConfig;
use serde_json::json;
use webdriver::capabilities::Capabilities;

/// Construct Chrome command-line arguments for a browser configuration.
pub fn build_chrome_arguments(browser: &BrowserConfig) -> Vec<String> {
    let mut args = vec![
        "--disable-gpu".to_string(),
        format!(
            "--window-size={},{}",
            browser.window_width, browser.window_height
        ),
        "--disable-notifications".to_string(),
        "--disable-popup-blocking".to_string(),
        format!("--user-agent={}", browser.user_agent),
    ];
    if browser.headless {
        args.insert(0, "--headless".to_string());
    }
    args
}

/// WebDriver capabilities requesting a Chrome session with [`build_chrome_arguments`].
pub fn chrome_capabilities(browser: &BrowserConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({ "args": build_chrome_arguments(browser) }),
    );
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_flag_controls_argument() {
        let mut browser = BrowserConfig::default();
        assert_eq!(build_chrome_arguments(&browser)[0], "--headless");

        browser.headless = false;
        let args = build_chrome_arguments(&browser);
        assert!(!args.iter().any(|a| a == "--headless"));
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
    }

    #[test]
    fn capabilities_carry_chrome_options() {
        let browser = BrowserConfig {
            user_agent: "driftnet-test".into(),
            ..BrowserConfig::default()
        };
        let caps = chrome_capabilities(&browser);
        let args = caps["goog:chromeOptions"]["args"]
            .as_array()
            .expect("args array");
        assert!(args.iter().any(|a| a == "--user-agent=driftnet-test"));
        assert!(args.iter().any(|a| a == "--disable-popup-blocking"));
    }
}

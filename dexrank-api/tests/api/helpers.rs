use dex_skill::{Clock, ManualClock};
use dexrank_api::configuration::{Settings, get_configuration};
use dexrank_api::startup::Application;
use dexrank_api::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use std::sync::Arc;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to init tracing");
    } else {
        let subscriber = get_subscriber(default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to init tracing");
    };
});

pub struct TestApp {
    address: String,
    pub clock: ManualClock,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns the app after letting the test adjust the configuration.
    pub async fn spawn_with(customize: impl FnOnce(&mut Settings)) -> Self {
        // `TRACING` is only executed the first time `initialize` is invoked.
        Lazy::force(&TRACING);

        // Randomise configuration to ensure test isolation
        let configuration = {
            let mut c = get_configuration().expect("Failed to read configuration.");
            // Use a random OS port
            c.application.port = 0;
            c.session.rng_seed = Some(3);
            customize(&mut c);
            c
        };

        // Time only moves when a test advances it
        let clock = ManualClock::starting_at(1_000_000);
        let application = Application::build_with_clock(&configuration, Arc::new(clock.clone()))
            .await
            .expect("Failed to build application.");
        let address = format!("http://127.0.0.1:{}", application.port());
        let _ = tokio::spawn(application.run_until_stopped());

        Self {
            address,
            clock,
            client: reqwest::Client::new(),
        }
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}/{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, path: &str, body: String) -> reqwest::Response {
        self.client
            .post(&format!("{}/{}", &self.address, path))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(&format!("{}/{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_health_check(&self) -> reqwest::Response {
        self.get("health_check").await
    }

    pub async fn post_next_battle(&self) -> reqwest::Response {
        self.post("battle/next", String::new()).await
    }

    pub async fn post_choice(&self, ids: &[u32]) -> reqwest::Response {
        self.post_json("battle/choice", &serde_json::json!({ "ids": ids }))
            .await
    }

    pub async fn get_ranking(&self) -> reqwest::Response {
        self.get("ranking").await
    }

    pub async fn post_move(&self, body: String) -> reqwest::Response {
        self.post("ranking/move", body).await
    }

    pub async fn get_milestone(&self) -> reqwest::Response {
        self.get("milestone").await
    }

    pub async fn post_dismiss(&self) -> reqwest::Response {
        self.post("milestone/dismiss", String::new()).await
    }

    /// Fetches a battle and picks its first id, leaving the clock past the debounce window.
    pub async fn play_battle(&self) -> Vec<u32> {
        let set: dexrank_api::domain::ComparisonSet = self
            .post_next_battle()
            .await
            .json()
            .await
            .expect("Failed to parse as JSON");
        self.clock.advance(1_000);
        let response = self.post_choice(&set.ids[..1]).await;
        assert_eq!(200, response.status().as_u16());
        set.ids
    }
}

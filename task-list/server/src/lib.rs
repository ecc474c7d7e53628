pub mod config {
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Slack bot token. Notifications are skipped when it is absent.
        #[serde(default)]
        pub slackbot_api_key: Option<String>,
        #[serde(default = "default_slack_channel")]
        pub slack_channel: String,
        #[serde(default = "default_notify_timeout_secs")]
        pub notify_timeout_secs: u64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_source(config::Environment::default())
        }

        pub fn from_source(source: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder().add_source(source).build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Upper bound for a single outbound notification call.
        pub fn notify_timeout(&self) -> Duration {
            Duration::from_secs(self.notify_timeout_secs)
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_slack_channel() -> String {
        "task-notifications".to_string()
    }

    fn default_notify_timeout_secs() -> u64 {
        5
    }

}
pub mod entities;
pub mod goal;
pub mod notify;
pub mod resource;
pub mod task;
pub mod web;

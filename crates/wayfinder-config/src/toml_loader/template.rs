//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Wayfinder Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[engine]
# model = "gpt-4o"
# base_url = "https://models.inference.ai.azure.com"
# temperature = 0.0        # 0.0-2.0
# max_tokens = 1024
# max_steps = 15           # 1-50, think/act steps per turn
# credential_env = "GITHUB_TOKEN"

[services]
# geocoding_url = "https://nominatim.openstreetmap.org/search"
# forecast_url = "https://api.open-meteo.com/v1/forecast"
# overpass_url = "https://overpass-api.de/api/interpreter"
# user_agent = "AI_Tourism_Agent/1.0"

[places]
# radius_m = 15000         # 100-100000
# categories = ["attraction", "museum", "zoo", "viewpoint"]
# result_limit = 20        # 1-500
# max_results = 10         # unset = list every unique name

[http]
# timeout_secs = 30        # unset = no timeout
# connect_timeout_secs = 10
# retries = 0              # 0-5

[logging]
# level = "INFO"           # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}

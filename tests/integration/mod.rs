mod http_api;
mod rating_scenarios;

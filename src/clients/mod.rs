pub mod web_api_client;

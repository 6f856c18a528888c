mod settings;
mod social_auth;
mod user;

pub mod audit;
pub mod chatbot;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod lead_score;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod response;
pub mod routes;
pub mod scheduling;
pub mod services;
pub mod state;
pub mod status;

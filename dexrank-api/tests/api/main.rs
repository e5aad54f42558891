mod battle;
mod health_check;
mod helpers;
mod milestone;
mod ranking;
mod session;

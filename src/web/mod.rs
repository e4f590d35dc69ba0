//! HTML front end (askama templates under `templates/`)

pub mod handlers;

pub mod animate;
pub mod app;
pub mod cards;
pub mod config;
pub mod content;
pub mod dom;
pub mod error;
pub mod event;
pub mod form;
pub mod input;
pub mod interaction;
pub mod logging;
pub mod map;
pub mod media;
pub mod nav;
pub mod overlay;
pub mod search;
pub mod selection;
pub mod site;
pub mod structured_data;
pub mod ui;
pub mod validate;

//! Santa tracker server.
//!
//! Loads Santa's Christmas Eve route and answers: "where is Santa now, and
//! where has he already been?" Lookups run in real time or against a
//! simulated clock that replays the night one minute per query.

pub mod domain;
pub mod itinerary;
pub mod tracker;
pub mod web;

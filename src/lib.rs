//! kinview: flat and tree view models over a genealogical record store
//!
//! A record store holds positional-tuple records keyed by stable string
//! handles. This crate projects those records into display rows: per
//! entity column and sort-key projections, a replaceable filter/search
//! predicate, cooperative full rebuilds, and incremental
//! add/update/delete keyed by handle. Nothing here depends on a widget
//! toolkit; the models expose rows and handle/position lookups, and a
//! front-end renders them.

pub mod data;
pub mod entities;
pub mod logging;
pub mod model;
pub mod symbols;

//! Query modules, one per concern. All take a `&Connection` so the engine
//! decides routing (writer vs read pool).

pub mod decision_crud;
pub mod decision_query;
pub mod lexical_search;
pub mod status_events;
pub mod supersedence_ops;
pub mod vector_search;

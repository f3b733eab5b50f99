/*!
 * Monitoring
 * Tracing setup; operation counters live with the map itself
 */

mod tracer;

pub use tracer::{init_tracing, TRACE_JSON_ENV};

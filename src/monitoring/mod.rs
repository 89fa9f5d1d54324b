/*!
 * Monitoring
 * Tracing setup for binaries embedding the VFS
 */

mod tracer;

pub use tracer::{init_tracing, span_operation, OperationSpan};

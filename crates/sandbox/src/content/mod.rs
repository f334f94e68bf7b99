mod compiler;
mod database;

pub use compiler::{
    compile_actor_defs, parse_actor_defs_str, ContentError, ContentErrorCode, SourceLocation,
};
pub use database::{ActorDef, ActorDefDatabase, ActorDefId};

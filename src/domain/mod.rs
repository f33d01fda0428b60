// Domain layer: models and the collaborator ports the dispatcher talks to.

pub mod model;
pub mod ports;

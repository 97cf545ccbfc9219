mod normalize;
mod show;
mod watch;

pub(super) use normalize::normalize;
pub(super) use show::{render, show};
pub(super) use watch::watch;

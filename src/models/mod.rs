mod device;
mod license;
mod subscription;
mod user;

pub use device::*;
pub use license::*;
pub use subscription::*;
pub use user::*;

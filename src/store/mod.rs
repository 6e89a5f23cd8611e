//! 存储层：记录类型与 Record Source/Sink 抽象及实现（Kinto / Mock）

pub mod kinto;
pub mod mock;
pub mod record;
pub mod traits;

pub use kinto::KintoStore;
pub use mock::MockStore;
pub use record::{BookRecord, Classification, PageToken, RecordPage};
pub use traits::{RecordStore, StoreError};

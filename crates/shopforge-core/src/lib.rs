//! # shopforge-core
//!
//! SHOPFORGE 도메인 모델, 포트(trait) 정의, 에러 타입, 설정 문서 스토어.
//! 세션 레이어와 네이티브 셸이 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`store`] — 설정 문서 스토어 (단일 진실 공급원)

#![recursion_limit = "256"]

pub mod error;
pub mod models;
pub mod ports;
pub mod store;

pub use error::{CoreError, CoreResult};
pub use store::{ConfigStore, StoreEvent};

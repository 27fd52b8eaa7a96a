pub mod kakao;

pub use kakao::KakaoClient;

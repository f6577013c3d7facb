//! PayloadCompiler - JobSpecification から DeploymentPayload への変換
//!
//! 純粋関数。外部呼び出しも乱数も使いません。
//!
//! The bid is `maxPrice * 10^16` in the payment token's smallest unit. The
//! factor is a fixed placeholder carried over from the reference network,
//! not a real token's decimals. Conversion works on the decimal digits of the
//! price, so the result is exact and never rendered in exponent form.

use crate::domain::payload::{DeploymentPayload, Job, Payment, Requirements};
use crate::domain::spec::JobSpecification;

/// 配信先ネットワーク識別子
pub const NETWORK: &str = "HNH_MAINNET";
/// ペイロードのプロトコルバージョン
pub const PROTOCOL_VERSION: &str = "1.0.2";
/// `job.type` の固定値
pub const JOB_TYPE: &str = "COMPUTE_ALLOCATION";
/// 要求する CUDA ランタイムの下限
pub const MIN_CUDA_VERSION: &str = ">=12.0";
/// 支払いトークン
pub const PAYMENT_TOKEN: &str = "ETH";

/// Smallest payment units per one USD/hour price unit, as a power of ten.
pub const SCALE_EXPONENT: usize = 16;

/// PayloadCompiler はステートレスな変換器
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadCompiler;

impl PayloadCompiler {
    /// PayloadCompiler を作成
    pub fn new() -> Self {
        Self
    }

    /// spec をそのまま `job.specs` に埋め込み、固定要件と入札額を付ける
    ///
    /// 同じ spec からは常にバイト単位で同じペイロードが得られます。
    pub fn compile(&self, spec: &JobSpecification) -> DeploymentPayload {
        DeploymentPayload {
            network: NETWORK.to_string(),
            version: PROTOCOL_VERSION.to_string(),
            job: Job {
                job_type: JOB_TYPE.to_string(),
                specs: spec.clone(),
                requirements: Requirements {
                    cuda_version: MIN_CUDA_VERSION.to_string(),
                    p2p_transfer: true,
                    secure_enclave: true,
                },
                payment: Payment {
                    token: PAYMENT_TOKEN.to_string(),
                    max_bid_wei: to_smallest_unit(spec.max_price_per_hour),
                },
            },
        }
    }
}

/// `round(price * 10^SCALE_EXPONENT)` as a decimal integer string.
///
/// Rounds half-up on the first dropped digit. Non-finite and non-positive
/// prices give `"0"`.
pub fn to_smallest_unit(price: f64) -> String {
    if !price.is_finite() || price <= 0.0 {
        return "0".to_string();
    }

    // f64 の Display は最短の往復表現で、指数表記を使わない
    let repr = price.to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    let frac: Vec<u8> = frac_part.bytes().map(|b| b - b'0').collect();
    for i in 0..SCALE_EXPONENT {
        digits.push(frac.get(i).copied().unwrap_or(0));
    }

    if frac.get(SCALE_EXPONENT).is_some_and(|&d| d >= 5) {
        increment(&mut digits);
    }

    let rendered: String = digits
        .iter()
        .skip_while(|&&d| d == 0)
        .map(|&d| char::from(b'0' + d))
        .collect();

    if rendered.is_empty() {
        "0".to_string()
    } else {
        rendered
    }
}

fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, 1);
}

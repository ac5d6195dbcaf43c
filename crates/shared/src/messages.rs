//! Fixed user-facing strings.

pub const USERNAME_TOO_SHORT: &str = "사용자명은 2자 이상 입력해주세요.";
pub const USERNAME_CHARSET: &str = "사용자명은 영문, 한글, 숫자, 언더스코어만 사용 가능합니다.";
pub const STUDENT_NUMBER_FORMAT: &str = "학번은 4-10자리 숫자로 입력해주세요.";
pub const PHONE_NUMBER_FORMAT: &str = "전화번호는 010-0000-0000 형식으로 입력해주세요.";

pub const CHECK_INPUT: &str = "입력 정보를 확인해주세요.";
pub const LOGIN_SUCCESS: &str = "로그인 성공! 메인 페이지로 이동합니다.";
pub const LOGIN_REJECTED: &str = "로그인 정보가 일치하지 않습니다. 다시 확인해주세요.";
pub const LOGIN_SYSTEM_ERROR: &str = "로그인 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

pub const LOGGING_OUT: &str = "로그아웃 중입니다...";
pub const WELCOME: &str = "마이페이지에 오신 것을 환영합니다!";

pub fn required(label: &str) -> String {
    format!("{label}을(를) 입력해주세요.")
}

/// One decimal digit, with ties rounded away from zero.
pub fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

pub fn gauge_raised(delta: f64) -> String {
    format!("온도가 {}°C 상승했습니다!", one_decimal(delta))
}

pub fn gauge_lowered(delta: f64) -> String {
    format!("온도가 {}°C 하락했습니다.", one_decimal(delta.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_round_up() {
        assert_eq!(one_decimal(0.25), "0.3");
        assert_eq!(one_decimal(36.25), "36.3");
        assert_eq!(one_decimal(36.5), "36.5");
        assert_eq!(one_decimal(0.04), "0.0");
    }

    #[test]
    fn gauge_messages_use_the_rounded_magnitude() {
        assert_eq!(gauge_raised(0.25), "온도가 0.3°C 상승했습니다!");
        assert_eq!(gauge_lowered(-0.25), "온도가 0.3°C 하락했습니다.");
        assert_eq!(gauge_lowered(-150.0), "온도가 150.0°C 하락했습니다.");
    }
}

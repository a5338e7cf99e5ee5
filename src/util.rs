// Console helpers shared by the stores and views.
// Outside wasm (unit tests) there is no console to talk to.

#[cfg(target_arch = "wasm32")]
pub fn clog(msg: &str) {
    gloo::console::log!(msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn clog(msg: &str) {
    let _ = msg;
}

#[cfg(target_arch = "wasm32")]
pub fn cwarn(msg: &str) {
    gloo::console::warn!(msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cwarn(msg: &str) {
    let _ = msg;
}

/// Zero-padded score readout, e.g. `pad_score(42, 5) == "00042"`.
pub fn pad_score(value: u64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_width() {
        assert_eq!(pad_score(42, 5), "00042");
        assert_eq!(pad_score(123456, 5), "123456");
    }
}

use rand::Rng;

const CHROME_VERSIONS: [&str; 8] = [
    "133.0.6943.88",
    "132.0.6834.110",
    "131.0.6778.108",
    "130.0.6723.117",
    "129.0.6668.89",
    "128.0.6613.138",
    "127.0.6533.119",
    "126.0.6478.182",
];

const FIREFOX_VERSIONS: [&str; 6] = ["133.0", "132.0", "131.0", "130.0", "129.0", "128.0"];

const SAFARI_VERSIONS: [&str; 4] = ["18.2", "18.1", "17.6", "17.5"];

const DESKTOP_PLATFORMS: [&str; 3] = [
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
];

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn gen_chrome_ua(rng: &mut impl Rng) -> String {
    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        pick(rng, &DESKTOP_PLATFORMS),
        pick(rng, &CHROME_VERSIONS)
    )
}

fn gen_firefox_ua(rng: &mut impl Rng) -> String {
    let version = pick(rng, &FIREFOX_VERSIONS);
    format!(
        "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
        pick(rng, &DESKTOP_PLATFORMS),
        version,
        version
    )
}

fn gen_safari_ua(rng: &mut impl Rng) -> String {
    format!(
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{} Safari/605.1.15",
        pick(rng, &SAFARI_VERSIONS)
    )
}

/// 隨機產生桌面瀏覽器的 User-Agent
pub fn gen_random_ua() -> String {
    let mut rng = rand::rng();
    match rng.random_range(0..10) {
        0..=5 => gen_chrome_ua(&mut rng), // 60% Chrome
        6..=8 => gen_firefox_ua(&mut rng), // 30% Firefox
        _ => gen_safari_ua(&mut rng),
    }
}

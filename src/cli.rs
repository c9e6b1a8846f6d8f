pub fn get_clap_command() -> clap::Command {
    clap::Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg(clap::Arg::new("FILE").help("Load this image on start").index(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_is_optional() {
        let matches = get_clap_command().try_get_matches_from(["resizer"]).unwrap();
        assert!(matches.get_one::<String>("FILE").is_none());
    }

    #[test]
    fn accepts_single_file() {
        let matches = get_clap_command()
            .try_get_matches_from(["resizer", "cat.png"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("FILE").map(String::as_str),
            Some("cat.png")
        );
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(get_clap_command()
            .try_get_matches_from(["resizer", "--fullscreen"])
            .is_err());
    }
}

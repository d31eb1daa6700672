// ── Environment host derivation ──
//
// Standard CDN hosts follow `{ref}--{repo}--{owner}.{domain}.page|live`.
// Custom hosts from the project config take precedence.

/// Inputs to host derivation, borrowed from a raw config.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostInputs<'a> {
    pub owner: Option<&'a str>,
    pub repo: Option<&'a str>,
    pub git_ref: &'a str,
    pub aem_domain: bool,
    pub preview_host: Option<&'a str>,
    pub live_host: Option<&'a str>,
    /// Legacy alias for `live_host`.
    pub outer_host: Option<&'a str>,
}

/// Derived inner (preview) and outer (live) hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentHosts {
    pub std_inner: Option<String>,
    pub std_outer: Option<String>,
    pub inner: Option<String>,
    pub outer: Option<String>,
}

/// Second-level CDN domain.
pub fn domain(aem_domain: bool) -> &'static str {
    if aem_domain { "aem" } else { "hlx" }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Compute standard and effective hosts.
pub fn derive(inputs: &HostInputs<'_>) -> EnvironmentHosts {
    let (std_inner, std_outer) = match (present(inputs.owner), present(inputs.repo)) {
        (Some(owner), Some(repo)) => {
            let prefix = format!("{}--{repo}--{owner}", inputs.git_ref);
            let domain = domain(inputs.aem_domain);
            (
                Some(format!("{prefix}.{domain}.page")),
                Some(format!("{prefix}.{domain}.live")),
            )
        }
        _ => (None, None),
    };

    let inner = present(inputs.preview_host)
        .map(str::to_owned)
        .or_else(|| std_inner.clone());
    let outer = present(inputs.live_host)
        .or_else(|| present(inputs.outer_host))
        .map(str::to_owned)
        .or_else(|| std_outer.clone());

    EnvironmentHosts {
        std_inner,
        std_outer,
        inner,
        outer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs<'a>() -> HostInputs<'a> {
        HostInputs {
            owner: Some("x"),
            repo: Some("y"),
            git_ref: "z",
            ..HostInputs::default()
        }
    }

    #[test]
    fn standard_hosts() {
        let hosts = derive(&inputs());
        assert_eq!(hosts.std_inner.as_deref(), Some("z--y--x.hlx.page"));
        assert_eq!(hosts.std_outer.as_deref(), Some("z--y--x.hlx.live"));
        assert_eq!(hosts.inner, hosts.std_inner);
        assert_eq!(hosts.outer, hosts.std_outer);
    }

    #[test]
    fn aem_domain_flag() {
        let hosts = derive(&HostInputs {
            aem_domain: true,
            ..inputs()
        });
        assert_eq!(hosts.std_inner.as_deref(), Some("z--y--x.aem.page"));
        assert_eq!(hosts.std_outer.as_deref(), Some("z--y--x.aem.live"));
    }

    #[test]
    fn custom_hosts_win() {
        let hosts = derive(&HostInputs {
            preview_host: Some("preview.example.com"),
            live_host: Some("live.example.com"),
            outer_host: Some("legacy.example.com"),
            ..inputs()
        });
        assert_eq!(hosts.inner.as_deref(), Some("preview.example.com"));
        assert_eq!(hosts.outer.as_deref(), Some("live.example.com"));
        assert_eq!(hosts.std_inner.as_deref(), Some("z--y--x.hlx.page"));
    }

    #[test]
    fn legacy_outer_alias() {
        let hosts = derive(&HostInputs {
            outer_host: Some("legacy.example.com"),
            ..inputs()
        });
        assert_eq!(hosts.outer.as_deref(), Some("legacy.example.com"));
    }

    #[test]
    fn no_standard_hosts_without_owner_and_repo() {
        let hosts = derive(&HostInputs {
            repo: None,
            preview_host: Some("preview.example.com"),
            ..inputs()
        });
        assert_eq!(hosts.std_inner, None);
        assert_eq!(hosts.std_outer, None);
        assert_eq!(hosts.inner.as_deref(), Some("preview.example.com"));
        assert_eq!(hosts.outer, None);
    }
}

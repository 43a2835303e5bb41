/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildMetadata {
    /// Lines printed by `compliance_desk_cli version`.
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!("compliance_desk {}", self.version),
            format!("commit   {} ({})", self.git_hash, self.git_status),
            format!("built    {}", self.timestamp),
            format!("target   {} [{}]", self.target, self.profile),
            format!("rustc    {}", self.rustc),
        ]
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("COMPLIANCE_DESK_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("COMPLIANCE_DESK_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("COMPLIANCE_DESK_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("COMPLIANCE_DESK_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("COMPLIANCE_DESK_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("COMPLIANCE_DESK_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_leads_with_package_version() {
        let lines = current().describe();
        assert_eq!(lines[0], format!("compliance_desk {}", env!("CARGO_PKG_VERSION")));
        assert_eq!(lines.len(), 5);
    }
}

use clap::ValueEnum;

use crate::cache::CredentialSet;

const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable `Name : value` lines
    Labeled,
    /// POSIX shell `export` statements
    #[default]
    Sh,
    /// fish `set -gx` statements
    Fish,
    /// PowerShell `$Env:` assignments
    Powershell,
}

/// Render the credential triple, one line per variable
pub fn render(creds: &CredentialSet, format: OutputFormat) -> String {
    let vars = [
        (ACCESS_KEY_VAR, creds.access_key_id.as_str()),
        (SECRET_KEY_VAR, creds.secret_access_key.as_str()),
        (SESSION_TOKEN_VAR, creds.session_token.as_str()),
    ];

    if format == OutputFormat::Labeled {
        return format!(
            "AccessKeyID : {}\nSecretAccessKey : {}\nSessionToken : {}\n",
            creds.access_key_id, creds.secret_access_key, creds.session_token
        );
    }

    let mut lines = Vec::with_capacity(vars.len());
    for (name, value) in vars {
        let line = match (format, value.is_empty()) {
            (OutputFormat::Fish, true) => format!("set -e {name};"),
            (OutputFormat::Fish, false) => format!("set -gx {name} {};", quote_posix(value)),
            (OutputFormat::Powershell, true) => {
                format!("Remove-Item Env:{name} -ErrorAction SilentlyContinue")
            }
            (OutputFormat::Powershell, false) => {
                format!("$Env:{name} = {}", quote_powershell(value))
            }
            (_, true) => format!("unset {name}"),
            (_, false) => format!("export {name}={}", quote_posix(value)),
        };
        lines.push(line);
    }

    lines.join("\n") + "\n"
}

/// Single-quote for sh and fish; embedded quotes close, escape and reopen
fn quote_posix(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn quote_powershell(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::issued;

    #[test]
    fn test_render_sh() {
        let out = render(&issued(None), OutputFormat::Sh);
        assert_eq!(
            out,
            "export AWS_ACCESS_KEY_ID='ASIAEXAMPLE'\n\
             export AWS_SECRET_ACCESS_KEY='secret'\n\
             export AWS_SESSION_TOKEN='token'\n"
        );
    }

    #[test]
    fn test_render_labeled() {
        let out = render(&issued(None), OutputFormat::Labeled);
        assert_eq!(
            out,
            "AccessKeyID : ASIAEXAMPLE\nSecretAccessKey : secret\nSessionToken : token\n"
        );
    }

    #[test]
    fn test_render_fish() {
        let out = render(&issued(None), OutputFormat::Fish);
        assert!(out.contains("set -gx AWS_ACCESS_KEY_ID 'ASIAEXAMPLE';"));
        assert!(out.contains("set -gx AWS_SESSION_TOKEN 'token';"));
    }

    #[test]
    fn test_render_powershell() {
        let out = render(&issued(None), OutputFormat::Powershell);
        assert!(out.contains("$Env:AWS_SECRET_ACCESS_KEY = 'secret'"));
    }

    #[test]
    fn test_empty_session_token_is_cleared() {
        let mut creds = issued(None);
        creds.session_token.clear();

        assert!(render(&creds, OutputFormat::Sh).contains("unset AWS_SESSION_TOKEN\n"));
        assert!(render(&creds, OutputFormat::Fish).contains("set -e AWS_SESSION_TOKEN;"));
        assert!(
            render(&creds, OutputFormat::Powershell)
                .contains("Remove-Item Env:AWS_SESSION_TOKEN -ErrorAction SilentlyContinue")
        );
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_posix("a'b"), r"'a'\''b'");
        assert_eq!(quote_posix("x/y+z="), "'x/y+z='");
        assert_eq!(quote_powershell("a'b"), "'a''b'");
    }
}

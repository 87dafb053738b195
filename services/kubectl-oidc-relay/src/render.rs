//! kubectl credential snippet
//!
//! Pure string rendering of the text returned on a successful callback: a
//! comment header telling the user what to do, followed by a
//! `config set-credentials` command that registers an `oidc` auth-provider
//! user named after the email address.

/// Values interpolated into the snippet.
#[derive(Debug, Clone, Copy)]
pub struct CredentialParams<'a> {
    pub command: &'a str,
    pub email: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub id_token: &'a str,
    pub issuer_url: &'a str,
    pub refresh_token: &'a str,
}

/// Render the snippet. Each value appears exactly once.
pub fn render_credentials(params: &CredentialParams<'_>) -> String {
    let CredentialParams {
        command,
        email,
        client_id,
        client_secret,
        id_token,
        issuer_url,
        refresh_token,
    } = params;

    format!(
        "\
# Run the following command to configure a kubernetes user for use with 'kubectl'.
# Then edit your kube config and set the user of your context to the
# credential name given on the first line of the command.

{command} config set-credentials {email} \\
--auth-provider=oidc \\
--auth-provider-arg=client-id={client_id} \\
--auth-provider-arg=client-secret={client_secret} \\
--auth-provider-arg=id-token={id_token} \\
--auth-provider-arg=idp-issuer-url={issuer_url} \\
--auth-provider-arg=refresh-token={refresh_token}
"
    )
}

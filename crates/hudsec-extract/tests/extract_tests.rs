// SPDX-FileCopyrightText: 2026 hudsec Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for token extraction over realistic documents.

use hudsec_extract::{TokenExtractor, DEFAULT_FIELD_TAGS};
use proptest::prelude::*;

const CREDENTIALS_XML: &str = r#"<?xml version='1.1' encoding='UTF-8'?>
<com.cloudbees.plugins.credentials.SystemCredentialsProvider plugin="credentials@1311.vcf0a_900b_37c2">
  <domainCredentialsMap class="hudson.util.CopyOnWriteMap$Hash">
    <entry>
      <com.cloudbees.plugins.credentials.domains.Domain>
        <specifications/>
      </com.cloudbees.plugins.credentials.domains.Domain>
      <java.util.concurrent.CopyOnWriteArrayList>
        <com.cloudbees.plugins.credentials.impl.UsernamePasswordCredentialsImpl>
          <scope>GLOBAL</scope>
          <id>deploy-user</id>
          <description>deploy account</description>
          <username>deploy</username>
          <password>{AQAAABAAAAAQwMrkAPQ3ZbCzSdd0F4Z0lkwVzxlBQlxNSMVpUSbuNCY=}</password>
        </com.cloudbees.plugins.credentials.impl.UsernamePasswordCredentialsImpl>
        <org.jenkinsci.plugins.plaincredentials.impl.StringCredentialsImpl>
          <scope>GLOBAL</scope>
          <id>slack-token</id>
          <secret>{AQAAABAAAAAgpLsQ7Kj0JZ5yE0d3PiCCkPIX1pCq2e0VPN3bKv8+Qe4=}</secret>
        </org.jenkinsci.plugins.plaincredentials.impl.StringCredentialsImpl>
        <com.cloudbees.jenkins.plugins.sshcredentials.impl.BasicSSHUserPrivateKey>
          <scope>GLOBAL</scope>
          <id>git-ssh</id>
          <username>git</username>
          <passphrase>{AQAAABAAAAAQ0pHY2j1nNhvA8r1pVjV5QhT6w3bC7Y1f4zq2vN8kX0I=}</passphrase>
          <privateKeySource class="com.cloudbees.jenkins.plugins.sshcredentials.impl.BasicSSHUserPrivateKey$DirectEntryPrivateKeySource">
            <privateKey>{AQAAABAAAAAwT2xkS2V5TWF0ZXJpYWxIZXJlT2xkS2V5TWF0ZXJpYWw=}</privateKey>
          </privateKeySource>
        </com.cloudbees.jenkins.plugins.sshcredentials.impl.BasicSSHUserPrivateKey>
        <legacy.Credentials>
          <password>bGVnYWN5IG9sZCBmb3JtYXQ=</password>
        </legacy.Credentials>
        <custom.TokenCredentials>
          <bearer>{AQAAABAAAAAQY3VzdG9tIGZpZWxkIG5hbWUgaGVyZQ==}</bearer>
        </custom.TokenCredentials>
      </java.util.concurrent.CopyOnWriteArrayList>
    </entry>
  </domainCredentialsMap>
</com.cloudbees.plugins.credentials.SystemCredentialsProvider>
"#;

#[test]
fn credentials_document_yields_every_secret_once() {
    let extractor = TokenExtractor::with_default_tags();
    let tokens = extractor.extract(CREDENTIALS_XML);

    let expected = [
        "AQAAABAAAAAQwMrkAPQ3ZbCzSdd0F4Z0lkwVzxlBQlxNSMVpUSbuNCY=",
        "AQAAABAAAAAgpLsQ7Kj0JZ5yE0d3PiCCkPIX1pCq2e0VPN3bKv8+Qe4=",
        "AQAAABAAAAAQ0pHY2j1nNhvA8r1pVjV5QhT6w3bC7Y1f4zq2vN8kX0I=",
        "AQAAABAAAAAwT2xkS2V5TWF0ZXJpYWxIZXJlT2xkS2V5TWF0ZXJpYWw=",
        "bGVnYWN5IG9sZCBmb3JtYXQ=",
        "AQAAABAAAAAQY3VzdG9tIGZpZWxkIG5hbWUgaGVyZQ==",
    ];
    for token in expected {
        assert!(tokens.contains(token), "missing {token}");
    }
    assert_eq!(tokens.len(), expected.len(), "unexpected extras: {tokens:?}");
}

#[test]
fn plain_fields_are_not_candidates() {
    let tokens = TokenExtractor::with_default_tags().extract(CREDENTIALS_XML);
    for plain in ["GLOBAL", "deploy", "deploy-user", "deploy account", "git"] {
        assert!(!tokens.contains(plain), "{plain} should not be extracted");
    }
}

#[test]
fn narrower_tag_list_still_uses_generic_pattern() {
    let tokens = TokenExtractor::new(["apiToken"]).unwrap().extract(CREDENTIALS_XML);

    // Braced values are still found, the bare old-format password is not.
    assert!(tokens.contains("AQAAABAAAAAQwMrkAPQ3ZbCzSdd0F4Z0lkwVzxlBQlxNSMVpUSbuNCY="));
    assert!(!tokens.contains("bGVnYWN5IG9sZCBmb3JtYXQ="));
}

#[test]
fn default_tags_cover_common_secret_fields() {
    for tag in ["apiToken", "password", "privateKey", "passphrase", "secret"] {
        assert!(DEFAULT_FIELD_TAGS.contains(&tag));
    }
}

proptest! {
    #[test]
    fn extract_is_idempotent(doc in "[<>{}/a-zA-Z0-9=+ \n]{0,200}") {
        let extractor = TokenExtractor::with_default_tags();
        prop_assert_eq!(extractor.extract(&doc), extractor.extract(&doc));
    }

    #[test]
    fn braced_token_under_any_known_tag_is_found(
        tag_idx in 0..DEFAULT_FIELD_TAGS.len(),
        token in "[A-Za-z0-9+/]{4,40}",
    ) {
        let tag = DEFAULT_FIELD_TAGS[tag_idx];
        let doc = format!("<root><{tag}>{{{token}}}</{tag}></root>");
        let tokens = TokenExtractor::with_default_tags().extract(&doc);
        prop_assert!(tokens.contains(&token));
        prop_assert_eq!(tokens.len(), 1);
    }
}

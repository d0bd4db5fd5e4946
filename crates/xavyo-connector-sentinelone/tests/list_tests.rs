//! List traversal tests for child-only units and the multi-phase role listing.

mod common;

use common::*;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};
use xavyo_connector::ids::ResourceId;
use xavyo_connector::pagination::Bag;
use xavyo_connector::traits::ResourceSyncer;
use xavyo_connector::types::{AccountType, UserStatus};
use xavyo_connector_sentinelone::{
    AccountSyncer, RoleSyncer, ServiceUserSyncer, SiteSyncer, UserSyncer,
};

#[tokio::test]
async fn test_child_units_without_parent_return_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let units: Vec<Box<dyn ResourceSyncer>> = vec![
        Box::new(UserSyncer::new(client.clone())),
        Box::new(ServiceUserSyncer::new(client.clone())),
        Box::new(SiteSyncer::new(client)),
    ];

    for unit in units {
        let page = unit.list(None, "").await.unwrap();
        assert!(page.items.is_empty());
        assert!(page.is_last());
    }
}

#[tokio::test]
async fn test_account_list_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "accounts",
        None,
        None,
        list_response(vec![account_json("a1", "Acme")], Some("acc-2")),
    )
    .await;
    mount_page(
        &server,
        "accounts",
        None,
        Some("acc-2"),
        list_response(vec![account_json("a2", "Globex")], None),
    )
    .await;

    let syncer = AccountSyncer::new(test_client(&server));
    let first = syncer.list(None, "").await.unwrap();
    assert_eq!(first.items[0].id, ResourceId::new("account", "a1"));
    assert_eq!(
        first.items[0].child_resource_types,
        vec!["user", "service_user", "site"]
    );
    assert!(!first.is_last());

    let second = syncer.list(None, &first.next_token).await.unwrap();
    assert_eq!(second.items[0].display_name, "Globex");
    assert!(second.is_last());
}

#[tokio::test]
async fn test_users_listed_under_account() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "users",
        Some(("accountsFilter", "a1")),
        None,
        list_response(vec![user_json("u1", "Mary Jane Doe", "account")], None),
    )
    .await;

    let parent = ResourceId::new("account", "a1");
    let syncer = UserSyncer::new(test_client(&server));
    let page = syncer.list(Some(&parent), "").await.unwrap();

    let user = &page.items[0];
    assert_eq!(user.parent_id.as_ref(), Some(&parent));
    assert_eq!(user.display_name, "Mary Jane Doe");

    let user_trait = user.user_trait.as_ref().unwrap();
    assert_eq!(user_trait.status, UserStatus::Enabled);
    assert_eq!(user_trait.profile.get_string("first_name"), Some("Mary"));
    assert_eq!(user_trait.profile.get_string("last_name"), Some("Jane Doe"));
    assert_eq!(user_trait.emails[0].address, "u1@example.com");
    assert!(page.is_last());
}

#[tokio::test]
async fn test_service_users_listed_under_account() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "service-users",
        Some(("accountsFilter", "a1")),
        None,
        list_response(vec![service_user_json("s1", "ci-bot", "account")], None),
    )
    .await;

    let parent = ResourceId::new("account", "a1");
    let syncer = ServiceUserSyncer::new(test_client(&server));
    let page = syncer.list(Some(&parent), "").await.unwrap();

    let user_trait = page.items[0].user_trait.as_ref().unwrap();
    assert_eq!(user_trait.account_type, AccountType::Service);
    assert_eq!(user_trait.status, UserStatus::Unspecified);
}

#[tokio::test]
async fn test_sites_listed_under_account() {
    let server = MockServer::start().await;
    let filter = Some(("accountsFilter", "a1"));
    mount_page(
        &server,
        "sites",
        filter,
        None,
        sites_response(vec![site_json("site1", "HQ", "a1")], Some("sites-2")),
    )
    .await;
    mount_page(
        &server,
        "sites",
        filter,
        Some("sites-2"),
        sites_response(
            vec![site_json("site2", "Lab", "a1"), site_json("site3", "Branch", "a1")],
            None,
        ),
    )
    .await;

    let parent = ResourceId::new("account", "a1");
    let syncer = SiteSyncer::new(test_client(&server));

    let first = syncer.list(Some(&parent), "").await.unwrap();
    assert!(!first.is_last());
    let second = syncer.list(Some(&parent), &first.next_token).await.unwrap();
    assert!(second.is_last());

    let sites: Vec<_> = first.items.iter().chain(second.items.iter()).collect();
    let ids: Vec<String> = sites.iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, vec!["site:site1", "site:site2", "site:site3"]);
    assert_eq!(sites[1].display_name, "Lab");
    assert!(sites.iter().all(|r| r.parent_id.as_ref() == Some(&parent)));
    assert_eq!(received_paths(&server).await, vec!["sites", "sites"]);
}

#[tokio::test]
async fn test_role_list_phases() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "rbac/roles",
        None,
        None,
        list_response(vec![predefined_role_json("7", "Viewer")], Some("roles-2")),
    )
    .await;
    mount_page(
        &server,
        "rbac/roles",
        None,
        Some("roles-2"),
        list_response(vec![predefined_role_json("8", "Admin")], None),
    )
    .await;
    mount_page(
        &server,
        "users",
        None,
        None,
        list_response(
            vec![
                user_with_roles_json(
                    "u1",
                    "Jane Doe",
                    "account",
                    vec![scope_role_json("42", "SOC Analyst", "Acme")],
                ),
                user_json("u2", "John Roe", "site"),
            ],
            None,
        ),
    )
    .await;
    mount_page(
        &server,
        "service-users",
        None,
        None,
        list_response(
            vec![{
                let mut s = service_user_json("s1", "ci-bot", "tenant");
                s["scopeRoles"] = serde_json::json!([scope_role_json("43", "Automation", "Acme")]);
                s
            }],
            None,
        ),
    )
    .await;

    let syncer = RoleSyncer::new(test_client(&server));
    let mut ids = Vec::new();
    let mut phases = Vec::new();
    let mut token = String::new();
    loop {
        let page = syncer.list(None, &token).await.unwrap();
        ids.extend(page.items.iter().map(|r| r.id.resource.clone()));
        if page.is_last() {
            break;
        }
        let bag = Bag::unmarshal(&page.next_token).unwrap();
        phases.push(bag.resource_type_id().unwrap_or_default().to_string());
        token = page.next_token;
    }

    assert_eq!(ids, vec!["7", "8", "42", "43"]);
    assert_eq!(phases, vec!["role", "user", "service_user"]);
    assert_eq!(
        received_paths(&server).await,
        vec!["rbac/roles", "rbac/roles", "users", "service-users"]
    );
}

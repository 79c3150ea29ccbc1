use crate::{
    config::Config,
    controller::{AccessController, Caller, ItemController, ListController, Lists, ServerController},
    reply,
};
use contracts::{Command, Embed, MessageEvent, ParsedMessage, Visibility};
use database::{DatabaseError, ListStore};
use std::{
    error::Error,
    fmt::{Debug, Display},
    sync::Arc,
};

pub type AppResult<T> = Result<T, AppError>;

pub struct App {
    config: Config,
    list_controller: ListController,
    item_controller: ItemController,
    access_controller: AccessController,
    server_controller: ServerController,
}

impl App {
    pub fn new(config: Config, store: Arc<dyn ListStore>) -> Self {
        let lists = Arc::new(Lists::new(store));

        let list_controller = ListController::new(lists.clone());
        let item_controller = ItemController::new(lists.clone());
        let access_controller = AccessController::new(lists);
        let server_controller = ServerController::new(config.prefix().to_owned());

        Self {
            config,
            list_controller,
            item_controller,
            access_controller,
            server_controller,
        }
    }

    /// Handle a single chat message, `None` means the bot stays silent
    pub async fn handle_message(&self, event: &MessageEvent) -> Option<Embed> {
        if self.config.is_own_message(&event.author_id) {
            return None;
        }

        let parsed = ParsedMessage::parse(&event.content, self.config.prefix())?;
        let command = match parsed.command() {
            Some(command) => command,
            None => {
                trace!("ignoring unknown command '{}'", parsed.command);
                return None;
            }
        };

        let timer = std::time::Instant::now();
        info!(
            "handling command '{}' on list '{}' from user {}",
            command, parsed.list, event.author_id
        );

        let result = self.dispatch(command, &parsed, event).await;

        info!(
            "handled command '{}' on list '{}' in {:?}",
            command,
            parsed.list,
            timer.elapsed()
        );

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                if let Some(context) = &err.context {
                    error!("error handling command '{}': {}", command, context);
                }
                err.reply
            }
        };

        Some(reply)
    }

    async fn dispatch(
        &self,
        command: Command,
        parsed: &ParsedMessage,
        event: &MessageEvent,
    ) -> AppResult<Embed> {
        if command.needs_list() && parsed.list.is_empty() {
            return Err(AppError::from(reply::hint(format!(
                "You need to tell me which list to use, try {}help",
                self.config.prefix()
            ))));
        }

        let caller = Caller::from(event);
        let list = parsed.list.as_str();
        let arg = parsed.arg.as_str();

        match command {
            Command::Add => {
                self.item_controller
                    .add(&caller, list, arg, chrono::Utc::now().timestamp())
                    .await
            }
            Command::Clear => self.list_controller.clear(&caller, list).await,
            Command::Create => {
                self.list_controller
                    .create(&caller, list, Visibility::Public, &[])
                    .await
            }
            Command::CreatePrivate => {
                let mut access = event.tagged();
                access.push(event.author_id.clone());
                self.list_controller
                    .create(&caller, list, Visibility::Private, &access)
                    .await
            }
            Command::CreatePersonal => {
                self.list_controller
                    .create(&caller, list, Visibility::Personal, &[])
                    .await
            }
            Command::AddToPrivate => {
                self.access_controller
                    .add_access(&caller, list, &event.tagged())
                    .await
            }
            Command::RemoveFromPrivate => {
                self.access_controller
                    .remove_access(&caller, list, &event.tagged())
                    .await
            }
            Command::Delete => self.list_controller.delete(&caller, list).await,
            Command::Edit => self.item_controller.edit(&caller, list, arg).await,
            Command::Get => self.list_controller.get(&caller, list, arg).await,
            Command::Help => self.server_controller.help(list),
            Command::List => self.list_controller.list_lists(&caller).await,
            Command::Ping => self.server_controller.ping(),
            Command::Random => self.item_controller.random(&caller, list).await,
            Command::Remove => self.item_controller.remove(&caller, list, arg).await,
            Command::Sort => self.list_controller.sort(&caller, list, arg).await,
        }
    }
}

/// A reply for the user, plus details for the log when something went wrong on our side
#[derive(Debug)]
pub struct AppError {
    pub reply: Embed,
    pub context: Option<String>,
}

impl AppError {
    pub fn with_context<T>(mut self, value: &T) -> Self
    where
        T: Debug,
    {
        self.context = Some(format!("{:?}", value));
        self
    }

    pub fn internal_error() -> Self {
        Self::from(reply::fail_msg())
    }

    pub fn no_list(list: &str) -> Self {
        Self::from(reply::no_list(list))
    }

    pub fn no_perms(list: &str) -> Self {
        Self::from(reply::no_perms(list))
    }

    /// Not-found errors become their replies, anything else is internal and the context
    /// names the store call that failed
    pub fn from_store(operation: &'static str, db_error: DatabaseError) -> Self {
        match db_error {
            DatabaseError::ListNotFound(list) => AppError::no_list(&list),
            DatabaseError::ListsNotFound => AppError::from(reply::no_lists()),
            other => AppError::internal_error().with_context(&(operation, other)),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reply.description)
    }
}

impl Error for AppError {}

impl From<Embed> for AppError {
    fn from(reply: Embed) -> Self {
        Self {
            reply,
            context: None,
        }
    }
}

/// Errors in what the user typed, shown to them as a hint
pub trait ParamsError: Error {}

impl<T> From<T> for AppError
where
    T: ParamsError,
{
    fn from(err: T) -> Self {
        AppError::from(reply::hint(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use contracts::{ListtoList, GREEN, RED, YELLOW};
    use database::{DatabaseResult, MemoryStore};

    const GUILD: &str = "guild1";

    fn app_with(store: Arc<dyn ListStore>) -> App {
        let config = Config::new("token", "^", Some("bot".to_string())).unwrap();
        App::new(config, store)
    }

    fn app() -> (App, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (app_with(store.clone()), store)
    }

    fn event(author: &str, content: &str) -> MessageEvent {
        MessageEvent {
            author_id: author.to_string(),
            guild_id: Some(GUILD.to_string()),
            channel_id: "channel1".to_string(),
            content: content.to_string(),
            roles: Vec::new(),
            mentions: Vec::new(),
            mention_roles: Vec::new(),
        }
    }

    fn direct(author: &str, content: &str) -> MessageEvent {
        MessageEvent {
            guild_id: None,
            ..event(author, content)
        }
    }

    async fn send(app: &App, event: MessageEvent) -> Embed {
        app.handle_message(&event)
            .await
            .unwrap_or_else(|| panic!("no reply to '{}'", event.content))
    }

    async fn say(app: &App, author: &str, content: &str) -> Embed {
        send(app, event(author, content)).await
    }

    async fn stored(store: &MemoryStore, guild: &str, name: &str) -> ListtoList {
        store.get_list(guild, name).await.unwrap()
    }

    fn values(list: &ListtoList) -> Vec<&str> {
        list.items.iter().map(|item| item.value.as_str()).collect()
    }

    #[tokio::test]
    async fn duplicate_items_are_noted() {
        let (app, store) = app();

        let created = say(&app, "userA", "^create Chores").await;
        assert_eq!(created.description, "Chores list created!");

        let first = say(&app, "userA", "^add Chores wash dishes").await;
        assert_eq!(first.description, "I added wash dishes to Chores!");

        let second = say(&app, "userA", "^a Chores wash dishes").await;
        assert_eq!(second.description, "I added wash dishes to Chores, again");
        assert_eq!(second.color, GREEN);

        let got = say(&app, "userB", "^get Chores").await;
        assert_eq!(got.fields[0].value, "wash dishes\nwash dishes");
        assert_eq!(got.fields[1].name, "List Entries");
        assert_eq!(got.fields[1].value, "2");

        assert_eq!(stored(&store, GUILD, "Chores").await.len(), 2);
    }

    #[tokio::test]
    async fn private_list_refuses_others() {
        let (app, store) = app();

        let created = say(&app, "userA", "^cp Secrets").await;
        assert_eq!(
            created.description,
            "I created a private list called Secrets for you"
        );

        let denied = say(&app, "userB", "^add Secrets the cake").await;
        assert_eq!(
            denied.description,
            "You have not been given permission to use Secrets"
        );
        assert_eq!(denied.color, YELLOW);

        let list = stored(&store, GUILD, "Secrets").await;
        assert!(list.is_empty());
        assert_eq!(list.access, vec!["userA".to_string()]);

        let allowed = say(&app, "userA", "^add Secrets the cake").await;
        assert_eq!(allowed.color, GREEN);
    }

    #[tokio::test]
    async fn private_list_tags_and_roles() {
        let (app, store) = app();

        let mut create = event("userA", "^createprivate Secrets @role1 @userB");
        create.mention_roles = vec!["role1".to_string()];
        create.mentions = vec!["userB".to_string()];
        send(&app, create).await;

        let list = stored(&store, GUILD, "Secrets").await;
        assert_eq!(
            list.access,
            vec!["role1".to_string(), "userB".to_string(), "userA".to_string()]
        );

        let mut by_role = event("userC", "^add Secrets plans");
        by_role.roles = vec!["role1".to_string()];
        assert_eq!(send(&app, by_role).await.color, GREEN);

        let denied = say(&app, "userD", "^get Secrets").await;
        assert_eq!(
            denied.description,
            "You have not been given permission to use Secrets"
        );
    }

    #[tokio::test]
    async fn grant_and_revoke_access() {
        let (app, store) = app();
        say(&app, "userA", "^cp Secrets").await;

        let mut grant = event("userA", "^ap Secrets @userB");
        grant.mentions = vec!["userB".to_string()];
        let granted = send(&app, grant).await;
        assert_eq!(
            granted.description,
            "I have added those tags to allowed users on Secrets"
        );
        assert_eq!(say(&app, "userB", "^get Secrets").await.color, GREEN);

        let mut revoke = event("userB", "^rp Secrets @userA");
        revoke.mentions = vec!["userA".to_string()];
        send(&app, revoke).await;
        assert_eq!(
            stored(&store, GUILD, "Secrets").await.access,
            vec!["userB".to_string()]
        );

        let mut last = event("userB", "^removefromprivate Secrets @userB");
        last.mentions = vec!["userB".to_string()];
        let refused = send(&app, last).await;
        assert_eq!(refused.color, YELLOW);
        assert_eq!(
            stored(&store, GUILD, "Secrets").await.access,
            vec!["userB".to_string()]
        );
    }

    #[tokio::test]
    async fn access_commands_need_private_lists() {
        let (app, _store) = app();
        say(&app, "userA", "^create Chores").await;

        let mut grant = event("userA", "^ap Chores @userB");
        grant.mentions = vec!["userB".to_string()];
        let refused = send(&app, grant).await;
        assert_eq!(
            refused.description,
            "Chores isn't a private list, everyone who can see it can already use it"
        );

        say(&app, "userA", "^cp Secrets").await;
        let untagged = say(&app, "userA", "^ap Secrets").await;
        assert_eq!(untagged.color, YELLOW);
    }

    #[tokio::test]
    async fn remove_by_index_out_of_bounds() {
        let (app, store) = app();
        say(&app, "userA", "^create Chores").await;
        for item in &["a", "b", "c"] {
            say(&app, "userA", &format!("^add Chores {}", item)).await;
        }

        let missing = say(&app, "userA", "^remove Chores 5").await;
        assert_eq!(
            missing.description,
            "Chores doesn't seem to have that many items!"
        );

        let edge = say(&app, "userA", "^r Chores 3").await;
        assert_eq!(edge.color, YELLOW);

        assert_eq!(values(&stored(&store, GUILD, "Chores").await), vec!["a", "b", "c"]);

        let removed = say(&app, "userA", "^r Chores 1").await;
        assert_eq!(removed.description, "I have removed b from Chores");
        let removed = say(&app, "userA", "^r Chores c").await;
        assert_eq!(removed.description, "I have removed c from Chores");
        let missing = say(&app, "userA", "^r Chores zzz").await;
        assert_eq!(missing.description, "Chores doesn't seem to contain zzz");

        assert_eq!(values(&stored(&store, GUILD, "Chores").await), vec!["a"]);
    }

    #[tokio::test]
    async fn delete_missing_list() {
        let (app, _store) = app();

        let reply = say(&app, "userA", "^delete Ghost").await;

        assert_eq!(reply.description, "I couldn't find a list called Ghost");
        assert_eq!(reply.color, YELLOW);
    }

    #[tokio::test]
    async fn delete_list() {
        let (app, store) = app();
        say(&app, "userA", "^create Chores").await;

        let deleted = say(&app, "userA", "^d Chores").await;
        assert_eq!(deleted.description, "I have deleted Chores");
        assert!(store.get_list(GUILD, "Chores").await.is_err());
    }

    #[tokio::test]
    async fn create_twice() {
        let (app, _store) = app();
        say(&app, "userA", "^create Chores").await;

        let again = say(&app, "userB", "^c Chores").await;

        assert_eq!(again.description, "I found another list already called Chores");
    }

    #[tokio::test]
    async fn edit_items() {
        let (app, store) = app();
        say(&app, "userA", "^create Chores").await;
        say(&app, "userA", "^add Chores wash dishes").await;
        say(&app, "userA", "^add Chores vacuum").await;

        let by_index = say(&app, "userA", "^edit Chores 0 dry dishes").await;
        assert_eq!(by_index.description, "I have updated wash dishes in Chores");

        let by_value = say(&app, "userA", r#"^e Chores "vacuum" "mop the floor""#).await;
        assert_eq!(by_value.description, "I have updated vacuum in Chores");

        let out_of_bounds = say(&app, "userA", "^e Chores 2 nothing").await;
        assert_eq!(
            out_of_bounds.description,
            "Chores doesn't seem to have that many items!"
        );

        let malformed = say(&app, "userA", "^e Chores dishes").await;
        assert_eq!(
            malformed.description,
            "The first argument needs to be a number or existing value!"
        );

        assert_eq!(
            values(&stored(&store, GUILD, "Chores").await),
            vec!["dry dishes", "mop the floor"]
        );
    }

    #[tokio::test]
    async fn sort_and_select() {
        let (app, store) = app();
        say(&app, "userA", "^create Chores").await;
        for item in &["b", "A", "c"] {
            say(&app, "userA", &format!("^add Chores {}", item)).await;
        }

        let bad = say(&app, "userA", "^sort Chores size").await;
        assert_eq!(bad.description, r#"Sorry! I only sort by "name" or "time"!"#);

        let sorted = say(&app, "userA", "^s Chores NAME").await;
        assert_eq!(sorted.description, "I have sorted Chores by name!");
        assert_eq!(
            values(&stored(&store, GUILD, "Chores").await),
            vec!["A", "b", "c"]
        );

        let item = say(&app, "userA", "^g Chores 1").await;
        assert_eq!(item.fields[0].name, "Item at position 1");
        assert_eq!(item.fields[0].value, "b");

        let missing = say(&app, "userA", "^g Chores 3").await;
        assert_eq!(missing.description, "I couldn't find an item at that position!");

        let not_a_number = say(&app, "userA", "^g Chores first").await;
        assert_eq!(not_a_number.description, "The searched item needs to be a number!");
    }

    #[tokio::test]
    async fn random_and_clear() {
        let (app, store) = app();
        say(&app, "userA", "^create Chores").await;

        let empty = say(&app, "userA", "^rv Chores").await;
        assert_eq!(empty.color, YELLOW);

        say(&app, "userA", "^add Chores only item").await;
        let picked = say(&app, "userA", "^random Chores").await;
        assert_eq!(picked.description, "A random element from Chores is only item");

        let cleared = say(&app, "userA", "^cl Chores").await;
        assert_eq!(cleared.description, "I've cleared Chores");
        assert!(stored(&store, GUILD, "Chores").await.is_empty());
    }

    #[tokio::test]
    async fn personal_lists() {
        let (app, store) = app();

        let created = say(&app, "userA", "^cm Mine").await;
        assert_eq!(created.description, "I created a personal list called Mine for you");
        assert_eq!(
            stored(&store, "userA", "Mine").await.visibility,
            Visibility::Personal
        );

        let added = say(&app, "userA", "^add Mine secret").await;
        assert_eq!(added.color, GREEN);

        let from_dm = send(&app, direct("userA", "^get Mine")).await;
        assert_eq!(from_dm.fields[0].value, "secret");

        let other = say(&app, "userB", "^get Mine").await;
        assert_eq!(other.description, "I couldn't find a list called Mine");

        let dm_create = send(&app, direct("userB", "^create Notes")).await;
        assert_eq!(
            dm_create.description,
            "I created a personal list called Notes for you"
        );
    }

    #[tokio::test]
    async fn list_visible_lists() {
        let (app, _store) = app();

        let none = say(&app, "userA", "^list").await;
        assert_eq!(none.description, "I couldn't find any lists for you");

        say(&app, "userA", "^create Chores").await;
        say(&app, "userA", "^cp Secrets").await;
        say(&app, "userA", "^cm Mine").await;

        let own = say(&app, "userA", "^l").await;
        assert_eq!(own.fields[0].value, "Chores\nSecrets\nMine");

        let other = say(&app, "userB", "^l").await;
        assert_eq!(other.fields[0].value, "Chores");
    }

    #[tokio::test]
    async fn ignored_messages() {
        let (app, _store) = app();

        assert_eq!(app.handle_message(&event("userA", "hello")).await, None);
        assert_eq!(app.handle_message(&event("userA", "^")).await, None);
        assert_eq!(app.handle_message(&event("userA", "^dance Chores")).await, None);
        assert_eq!(app.handle_message(&event("bot", "^ping")).await, None);

        let pong = say(&app, "userA", "^PING").await;
        assert_eq!(pong.description, "pong");
    }

    #[tokio::test]
    async fn missing_list_name() {
        let (app, _store) = app();

        let reply = say(&app, "userA", "^add").await;

        assert_eq!(reply.description, "You need to tell me which list to use, try ^help");
    }

    #[tokio::test]
    async fn help_pages() {
        let (app, _store) = app();

        let overview = say(&app, "userA", "^help").await;
        assert_eq!(overview.fields[0].name, "help, h");

        let lists = say(&app, "userA", "^h Lists").await;
        assert!(lists.description.contains("lists"));

        let items = say(&app, "userA", "^h items").await;
        assert_eq!(items.fields[0].name, "add, a");
    }

    struct BrokenStore;

    #[async_trait]
    impl ListStore for BrokenStore {
        async fn get_list(&self, _guild: &str, _name: &str) -> DatabaseResult<ListtoList> {
            Err(DatabaseError::MissingField("guild"))
        }

        async fn get_all_lists(
            &self,
            _guild: &str,
            _user: Option<&str>,
        ) -> DatabaseResult<Vec<ListtoList>> {
            Err(DatabaseError::MissingField("guild"))
        }

        async fn put_list(&self, _list: &ListtoList) -> DatabaseResult<()> {
            Err(DatabaseError::MissingField("guild"))
        }

        async fn delete_list(&self, _guild: &str, _name: &str) -> DatabaseResult<()> {
            Err(DatabaseError::MissingField("guild"))
        }
    }

    #[tokio::test]
    async fn store_failures_are_generic() {
        let app = app_with(Arc::new(BrokenStore));

        for content in &["^get Chores", "^create Chores", "^list", "^add Chores x"] {
            let reply = say(&app, "userA", content).await;
            assert_eq!(reply.description, "Oops, I had a problem doing that for you");
            assert_eq!(reply.color, RED);
        }
    }

    #[test]
    fn database_errors_map_to_replies() {
        let not_found =
            AppError::from_store("get_list", DatabaseError::ListNotFound("Chores".to_string()));
        assert!(not_found.context.is_none());
        assert_eq!(not_found.reply, reply::no_list("Chores"));

        let none = AppError::from_store("get_all_lists", DatabaseError::ListsNotFound);
        assert!(none.context.is_none());
        assert_eq!(none.reply, reply::no_lists());

        let internal = AppError::from_store("put_list", DatabaseError::MissingField("name"));
        assert_eq!(internal.reply, reply::fail_msg());
        let context = internal.context.unwrap();
        assert!(context.contains("put_list"), "{}", context);
        assert!(context.contains("MissingField"), "{}", context);
    }

    /// Reads work, writes fail
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl ListStore for ReadOnlyStore {
        async fn get_list(&self, guild: &str, name: &str) -> DatabaseResult<ListtoList> {
            self.0.get_list(guild, name).await
        }

        async fn get_all_lists(
            &self,
            guild: &str,
            user: Option<&str>,
        ) -> DatabaseResult<Vec<ListtoList>> {
            self.0.get_all_lists(guild, user).await
        }

        async fn put_list(&self, _list: &ListtoList) -> DatabaseResult<()> {
            Err(DatabaseError::MissingField("guild"))
        }

        async fn delete_list(&self, _guild: &str, _name: &str) -> DatabaseResult<()> {
            Err(DatabaseError::MissingField("guild"))
        }
    }

    async fn failure_context(app: &App, content: &str) -> String {
        let event = event("userA", content);
        let parsed = ParsedMessage::parse(&event.content, "^").unwrap();
        let command = parsed.command().unwrap();

        let err = app.dispatch(command, &parsed, &event).await.unwrap_err();

        assert_eq!(err.reply, reply::fail_msg());
        err.context.unwrap()
    }

    #[tokio::test]
    async fn store_failures_name_the_store_call() {
        let store = ReadOnlyStore(MemoryStore::new());
        store
            .0
            .put_list(&ListtoList::new(GUILD, "Chores", Visibility::Public))
            .await
            .unwrap();
        let app = app_with(Arc::new(store));

        assert!(failure_context(&app, "^add Chores x").await.contains("put_list"));
        assert!(failure_context(&app, "^create Shopping").await.contains("put_list"));
        assert!(failure_context(&app, "^delete Chores").await.contains("delete_list"));

        let app = app_with(Arc::new(BrokenStore));
        assert!(failure_context(&app, "^get Chores").await.contains("get_list"));
        assert!(failure_context(&app, "^list").await.contains("get_all_lists"));
    }
}

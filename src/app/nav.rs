use crate::error::AppResult;

use super::state::Browser;

impl Browser {
    /// Loads the page a followed link asked for. Unknown pages leave the
    /// current one in place.
    pub(crate) fn follow_navigation(&mut self) -> AppResult<bool> {
        let Some(target) = self.site.take_navigation() else {
            return Ok(false);
        };
        let Some(page) = self.content.page(&target) else {
            tracing::warn!(page = %target, "link to unknown page");
            self.set_status(format!("No such page: {target}"));
            return Ok(false);
        };

        let doc = self.content.build_document(page)?;
        let title = page.title.clone();
        let file = page.file.clone();
        self.site.replace_page(Box::new(doc));
        self.page_title = title;
        self.scroll = 0;
        self.total_lines = 0;
        self.revealed.clear();
        self.editor = None;
        self.follow_focus = false;
        self.set_status(format!("Opened {file}"));
        Ok(true)
    }
}

//! Browser chat page served at `/`.
//!
//! Self-contained HTML/CSS/JS. The page keeps its own message list, posts to
//! `/api/chat`, and inserts assistant replies from the server-rendered `html`
//! field. User text is only ever inserted as text.

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};

use crate::state::AppState;

/// GET / - the chat page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /highlight.css - classes used by highlighted code blocks.
pub async fn highlight_css(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.renderer.theme_css().to_string(),
    )
}

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>AI Assistant</title>
<link rel="stylesheet" href="/highlight.css">
<style>
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#1d232a;color:#a6adbb;min-height:100vh;display:flex;flex-direction:column}
header{border-bottom:1px solid #2a323c;padding:16px 24px;display:flex;align-items:center;justify-content:center;position:relative}
header h1{font-size:24px;font-weight:700;color:#d7dde4}
header button{position:absolute;right:24px;padding:6px 12px;background:transparent;color:#a6adbb;border:1px solid #2a323c;border-radius:6px;cursor:pointer}
main{flex:1;overflow-y:auto;padding:24px}
.messages{max-width:1100px;margin:0 auto;display:flex;flex-direction:column;gap:12px}
.msg{max-width:85%;padding:10px 14px;border-radius:14px;border:1px solid #2a323c;background:#191e24;line-height:1.5;word-wrap:break-word}
.msg.user{align-self:flex-end;white-space:pre-wrap}
.msg.bot{align-self:flex-start}
.prose{white-space:pre-wrap}
.code-block{border:1px solid #525252;border-radius:8px;margin:16px 0;overflow:hidden;background:#2b303b}
.code-header{display:flex;justify-content:space-between;align-items:center;background:#15191e;padding:6px 12px;font-size:13px;font-weight:600}
.copy-btn{background:transparent;border:none;color:#a6adbb;cursor:pointer;font-size:13px}
.copy-btn:hover{color:#f000b8}
pre{margin:0;padding:12px;font-size:13px;overflow-x:auto}
.typing{display:none;align-items:center;justify-content:center;gap:8px;font-size:14px;padding:8px}
.typing.active{display:flex}
.spinner{width:16px;height:16px;border:2px solid #661ae6;border-top-color:transparent;border-radius:50%;animation:spin .8s linear infinite}
@keyframes spin{to{transform:rotate(360deg)}}
footer{position:sticky;bottom:0;background:#15191e;border-top:1px solid #2a323c;padding:16px}
.input-bar{max-width:1100px;margin:0 auto;display:flex;gap:8px}
.input-bar input{flex:1;padding:10px 14px;border:1px solid #2a323c;border-radius:8px;background:#1d232a;color:#d7dde4;font-size:15px;outline:none}
.input-bar button{padding:10px 20px;background:#d926a9;color:#fff;border:none;border-radius:8px;font-weight:600;cursor:pointer}
</style>
</head>
<body>
<header>
  <h1>AI Assistant</h1>
  <button id="new-chat" type="button">New chat</button>
</header>
<main id="scroller">
  <div class="messages" id="messages"></div>
  <div class="typing" id="typing"><span class="spinner"></span><span>Bot is typing...</span></div>
  <div id="end"></div>
</main>
<footer>
  <div class="input-bar">
    <input id="input" type="text" placeholder="Type your message..." autocomplete="off">
    <button id="send" type="button">Send</button>
  </div>
</footer>
<script>
const ERROR_REPLY = "Error communicating with the chatbot.";
const messagesEl = document.getElementById('messages');
const typingEl = document.getElementById('typing');
const inputEl = document.getElementById('input');
const sendBtn = document.getElementById('send');
const newChatBtn = document.getElementById('new-chat');
let pending = 0;

function newSessionId() {
  if (window.crypto && crypto.randomUUID) return crypto.randomUUID();
  return 's' + Date.now().toString(36) + Math.random().toString(36).slice(2);
}

let sessionId = sessionStorage.getItem('chatgate-session') || newSessionId();
sessionStorage.setItem('chatgate-session', sessionId);

function scrollToBottom() {
  document.getElementById('end').scrollIntoView({ behavior: 'smooth' });
}

function setLoading(delta) {
  pending += delta;
  typingEl.classList.toggle('active', pending > 0);
}

function appendUser(text) {
  const div = document.createElement('div');
  div.className = 'msg user';
  div.textContent = text;
  messagesEl.appendChild(div);
  scrollToBottom();
}

function appendBotHtml(html) {
  const div = document.createElement('div');
  div.className = 'msg bot';
  div.innerHTML = html;
  messagesEl.appendChild(div);
  scrollToBottom();
}

function appendBotText(text) {
  const div = document.createElement('div');
  div.className = 'msg bot prose';
  div.textContent = text;
  messagesEl.appendChild(div);
  scrollToBottom();
}

async function sendMessage() {
  const text = inputEl.value;
  if (!text.trim()) return;
  appendUser(text);
  inputEl.value = '';
  setLoading(1);
  try {
    const res = await fetch('/api/chat', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ prompt: text, session_id: sessionId }),
    });
    if (!res.ok) throw new Error('status ' + res.status);
    const data = await res.json();
    if (data.html) appendBotHtml(data.html); else appendBotText(data.script);
  } catch (err) {
    console.error('chat request failed', err);
    appendBotText(ERROR_REPLY);
  } finally {
    setLoading(-1);
    scrollToBottom();
  }
}

inputEl.addEventListener('keydown', (e) => {
  if (e.key === 'Enter') sendMessage();
});
sendBtn.addEventListener('click', sendMessage);

messagesEl.addEventListener('click', async (e) => {
  const btn = e.target.closest('.copy-btn');
  if (!btn) return;
  try {
    await navigator.clipboard.writeText(btn.dataset.clipboardText);
    btn.textContent = 'copied';
    setTimeout(() => { btn.textContent = 'copy'; }, 1500);
  } catch (err) {
    console.error('copy failed', err);
  }
});

newChatBtn.addEventListener('click', async () => {
  try {
    await fetch('/api/chat/' + encodeURIComponent(sessionId), { method: 'DELETE' });
  } catch (err) {
    console.error('reset failed', err);
  }
  sessionId = newSessionId();
  sessionStorage.setItem('chatgate-session', sessionId);
  messagesEl.replaceChildren();
});
</script>
</body>
</html>
"#;

/// Replaced by the session token when the page is served.
pub(crate) const TOKEN_PLACEHOLDER: &str = "__SESSION_TOKEN__";

/// The bridge page. It looks for the injected Ronin provider, announces the result and then
/// executes whatever the debugger queues for it.
pub(crate) const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Ronin Wallet Debugger</title>
  <style>
    body { font-family: ui-monospace, monospace; margin: 2rem; background: #111; color: #ddd; }
    h1 { font-size: 1.2rem; }
    #status { margin: 1rem 0; }
    #activity { white-space: pre-wrap; font-size: 0.85rem; color: #9a9a9a; }
    .ok { color: #6c6; }
    .err { color: #e66; }
  </style>
</head>
<body>
  <h1>Ronin Wallet Debugger bridge</h1>
  <div id="status">Looking for Ronin Wallet...</div>
  <p>Keep this tab open while using <code>ronin-debug</code>. Wallet prompts appear here.</p>
  <div id="activity"></div>
  <script>
    const TOKEN = "__SESSION_TOKEN__";
    const POLL_MS = 250;
    const statusEl = document.getElementById("status");
    const activityEl = document.getElementById("activity");

    function note(text) {
      activityEl.textContent = `[${new Date().toLocaleTimeString()}] ${text}\n` + activityEl.textContent;
    }

    async function api(path, body) {
      const init = { headers: { "X-Session-Token": TOKEN } };
      if (body !== undefined) {
        init.method = "POST";
        init.headers["Content-Type"] = "application/json";
        init.body = JSON.stringify(body);
      }
      const res = await fetch(`/api/${path}`, init);
      if (!res.ok) throw new Error(`${path}: HTTP ${res.status}`);
      return res.json();
    }

    function findProvider() {
      if (window.ronin && window.ronin.provider) return window.ronin.provider;
      if (window.ethereum && window.ethereum.isRonin) return window.ethereum;
      return null;
    }

    async function waitForProvider() {
      for (let i = 0; i < 20; i++) {
        const provider = findProvider();
        if (provider) return provider;
        await new Promise((r) => setTimeout(r, 100));
      }
      return null;
    }

    async function execute(provider, command) {
      if (command.type === "open") {
        note(`opening ${command.url}`);
        window.open(command.url, "_blank");
        return;
      }
      note(`${command.method}`);
      let response;
      try {
        const result = await provider.request({ method: command.method, params: command.params });
        response = { id: command.id, result: result === undefined ? null : result };
      } catch (err) {
        const code = typeof err?.code === "number" ? err.code : -32603;
        response = { id: command.id, error: { code, message: String(err?.message ?? err) } };
        note(`${command.method} failed: ${response.error.message}`);
      }
      await api("response", response);
    }

    async function main() {
      const provider = await waitForProvider();
      await api("provider", {
        found: provider !== null,
        hostname: window.location.hostname,
        origin: window.location.origin,
      });
      if (provider) {
        statusEl.textContent = "Ronin Wallet found, bridge connected.";
        statusEl.className = "ok";
      } else {
        statusEl.textContent = "Ronin Wallet not found. Please install it first.";
        statusEl.className = "err";
      }

      for (;;) {
        try {
          const reply = await api("command");
          if (reply.status === "ok" && reply.data) {
            await execute(provider, reply.data);
            continue;
          }
        } catch (err) {
          note(`bridge error: ${err.message}`);
        }
        await new Promise((r) => setTimeout(r, POLL_MS));
      }
    }

    main();
  </script>
</body>
</html>
"#;
